// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Double-size rewrite for ESC/POS-style command streams.
//
// Kitchen tickets arrive as raw printer command bytes. The producer emits
// them at whatever character size its template uses; the kitchen wants
// everything in double size. Rather than touch the producer, we rewrite
// every `ESC ! n` size-select command to `ESC ! 0x30` on the way to the
// printer — and if a document never selects a size at all, we prepend the
// command so the default is still double size.
//
// Section separators (a full line of dashes) must survive untouched, so
// separator detection runs before command detection at every offset.

use tracing::debug;

/// ESC (0x1B) — command prefix byte for ESC/POS control sequences.
pub const ESC: u8 = 0x1B;

/// `'!'` (0x21) — the ESC/POS "select print mode" command letter. The byte
/// after it is the size/style parameter.
pub const SIZE_SELECT: u8 = 0x21;

/// Parameter value for double-width, double-height text.
pub const DOUBLE_SIZE: u8 = 0x30;

/// `'-'` (0x2D) — the byte the ticket template uses for separator lines.
pub const DASH: u8 = 0x2D;

/// A separator is a run of exactly this many consecutive dashes (one full
/// line at the template's column width).
pub const SEPARATOR_LEN: usize = 42;

/// Rewrite a command stream so it renders in double size.
///
/// Single left-to-right pass:
/// - a 42-dash separator run is copied verbatim (and wins over command
///   detection at the same offset);
/// - `ESC ! n` becomes `ESC ! 0x30`, whatever `n` was;
/// - everything else passes through unchanged.
///
/// If the output ends up containing no `ESC !` pair at all, the triplet
/// `ESC ! 0x30` is prepended so the printer still switches to double size.
///
/// Total function: never fails, never blocks, no side effects beyond a
/// trace line. The transform is length-preserving except for that 3-byte
/// prepend.
pub fn force_double_size(input: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(input.len() + 3);
    let mut i = 0;

    while i < input.len() {
        // Separator run first. The bounds check is "at least 42 bytes
        // remain", so a run flush against the end of the buffer still
        // counts.
        if input.len() - i >= SEPARATOR_LEN
            && input[i..i + SEPARATOR_LEN].iter().all(|&b| b == DASH)
        {
            output.extend_from_slice(&input[i..i + SEPARATOR_LEN]);
            i += SEPARATOR_LEN;
            continue;
        }

        if input.len() - i >= 3 && input[i] == ESC && input[i + 1] == SIZE_SELECT {
            output.extend_from_slice(&[ESC, SIZE_SELECT, DOUBLE_SIZE]);
            i += 3;
            continue;
        }

        output.push(input[i]);
        i += 1;
    }

    // The trailing scan deliberately stops two positions short of the end:
    // an `ESC !` pair occupying the final two bytes does not count. This
    // mirrors the behaviour the ticket producers were validated against.
    let has_size_command = (0..output.len().saturating_sub(2))
        .any(|j| output[j] == ESC && output[j + 1] == SIZE_SELECT);

    if !has_size_command {
        debug!(len = output.len(), "no size command in stream — prepending double-size select");
        output.splice(0..0, [ESC, SIZE_SELECT, DOUBLE_SIZE]);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_becomes_bare_size_command() {
        assert_eq!(force_double_size(&[]), vec![ESC, SIZE_SELECT, DOUBLE_SIZE]);
    }

    #[test]
    fn plain_text_gets_command_prepended() {
        let input = b"HELLO KITCHEN";
        let output = force_double_size(input);
        assert_eq!(&output[..3], &[ESC, SIZE_SELECT, DOUBLE_SIZE]);
        assert_eq!(&output[3..], input);
    }

    #[test]
    fn short_input_gets_command_prepended() {
        let output = force_double_size(b"HI");
        assert_eq!(output, vec![ESC, SIZE_SELECT, DOUBLE_SIZE, b'H', b'I']);
    }

    #[test]
    fn size_parameter_is_forced_to_double() {
        let output = force_double_size(&[ESC, SIZE_SELECT, 0x99]);
        assert_eq!(output, vec![ESC, SIZE_SELECT, DOUBLE_SIZE]);
    }

    #[test]
    fn every_size_command_is_rewritten() {
        let input = [
            ESC, SIZE_SELECT, 0x00, b'A', ESC, SIZE_SELECT, 0x11, b'B',
        ];
        let output = force_double_size(&input);
        assert_eq!(
            output,
            vec![ESC, SIZE_SELECT, DOUBLE_SIZE, b'A', ESC, SIZE_SELECT, DOUBLE_SIZE, b'B']
        );
    }

    #[test]
    fn separator_run_passes_through_without_prepend_suppression() {
        // A lone separator contains no size command, so the fallback fires.
        let input = vec![DASH; SEPARATOR_LEN];
        let output = force_double_size(&input);
        assert_eq!(&output[..3], &[ESC, SIZE_SELECT, DOUBLE_SIZE]);
        assert_eq!(&output[3..], &input[..]);
    }

    #[test]
    fn separator_at_end_of_buffer_is_still_a_run() {
        let mut input = vec![b'X'];
        input.extend(std::iter::repeat_n(DASH, SEPARATOR_LEN));
        let output = force_double_size(&input);
        assert_eq!(&output[..3], &[ESC, SIZE_SELECT, DOUBLE_SIZE]);
        assert_eq!(&output[3..], &input[..]);
    }

    #[test]
    fn separator_followed_by_size_command() {
        let mut input = vec![DASH; SEPARATOR_LEN];
        input.extend([ESC, SIZE_SELECT, 0x05]);
        let output = force_double_size(&input);

        let mut expected = vec![DASH; SEPARATOR_LEN];
        expected.extend([ESC, SIZE_SELECT, DOUBLE_SIZE]);
        assert_eq!(output, expected);
    }

    #[test]
    fn forty_one_dashes_are_not_a_separator() {
        // One dash short of a separator: plain bytes, fallback fires.
        let input = vec![DASH; SEPARATOR_LEN - 1];
        let output = force_double_size(&input);
        assert_eq!(output.len(), input.len() + 3);
        assert_eq!(&output[..3], &[ESC, SIZE_SELECT, DOUBLE_SIZE]);
    }

    #[test]
    fn eighty_four_dashes_are_two_runs() {
        let input = vec![DASH; SEPARATOR_LEN * 2];
        let output = force_double_size(&input);
        assert_eq!(&output[3..], &input[..]);
    }

    #[test]
    fn trailing_scan_ignores_pair_in_last_two_positions() {
        // `ESC !` as the final two bytes sits outside the search window, so
        // the fallback still prepends even though the pair is present.
        let input = [b'A', ESC, SIZE_SELECT];
        let output = force_double_size(&input);
        assert_eq!(
            output,
            vec![ESC, SIZE_SELECT, DOUBLE_SIZE, b'A', ESC, SIZE_SELECT]
        );
    }

    #[test]
    fn truncated_command_at_end_is_copied_verbatim() {
        // Only 2 bytes remain: not enough for a command, copied through.
        let input = [ESC, SIZE_SELECT];
        let output = force_double_size(&input);
        assert_eq!(output, vec![ESC, SIZE_SELECT, DOUBLE_SIZE, ESC, SIZE_SELECT]);
    }

    #[test]
    fn output_always_contains_a_double_size_triplet() {
        let samples: Vec<Vec<u8>> = vec![
            vec![],
            b"plain ticket text".to_vec(),
            vec![DASH; SEPARATOR_LEN],
            vec![ESC, SIZE_SELECT, 0x00],
            vec![ESC, 0x40, b'x'], // ESC @ — a different command, untouched
        ];
        for input in samples {
            let output = force_double_size(&input);
            let found = output
                .windows(3)
                .any(|w| w == [ESC, SIZE_SELECT, DOUBLE_SIZE]);
            assert!(found, "no double-size triplet for input {input:?}");
        }
    }

    #[test]
    fn end_to_end_ticket_shape() {
        // Header, separator, body with an explicit small-size command.
        let mut input = Vec::new();
        input.extend(b"ORDER 17\n".iter());
        input.extend(std::iter::repeat_n(DASH, SEPARATOR_LEN));
        input.push(b'\n');
        input.extend([ESC, SIZE_SELECT, 0x01]);
        input.extend(b"2x BURGER\n".iter());

        let output = force_double_size(&input);

        // Separator intact, parameter rewritten, nothing prepended.
        let sep_start = b"ORDER 17\n".len();
        assert_eq!(
            &output[sep_start..sep_start + SEPARATOR_LEN],
            &vec![DASH; SEPARATOR_LEN][..]
        );
        assert!(output.windows(3).any(|w| w == [ESC, SIZE_SELECT, DOUBLE_SIZE]));
        assert!(!output.windows(3).any(|w| w == [ESC, SIZE_SELECT, 0x01]));
        assert_eq!(output.len(), input.len());
    }
}
