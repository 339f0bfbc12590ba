//! Property tests: after any sequence of edits, once the debounce window has
//! passed, the published set equals a full rescan of the final content.

use std::time::{Duration, Instant};

use lineend_buffer::{EditorBuffer, TextBuffer};
use lineend_config::DefaultLineEnding;
use lineend_core::{LineEnding, LineEndingSet, Platform};
use lineend_tracker::{compute_line_endings, convert, LineEndingTracker, TrackerSettings};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Edit {
    Insert { at: usize, text: String },
    Remove { at: usize, len: usize },
    Replace { at: usize, len: usize, text: String },
    SetText(String),
    Convert(LineEnding),
}

/// Text biased towards terminators and carriage-return edge cases.
fn text_strategy(max_len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            3 => Just("a"),
            2 => Just("\n"),
            2 => Just("\r\n"),
            2 => Just("\r"),
            1 => Just("b"),
        ],
        0..max_len,
    )
    .prop_map(|parts| parts.concat())
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        4 => (any::<usize>(), text_strategy(4)).prop_map(|(at, text)| Edit::Insert { at, text }),
        3 => (any::<usize>(), 0usize..4).prop_map(|(at, len)| Edit::Remove { at, len }),
        3 => (any::<usize>(), 0usize..4, text_strategy(3))
            .prop_map(|(at, len, text)| Edit::Replace { at, len, text }),
        1 => text_strategy(6).prop_map(Edit::SetText),
        1 => prop_oneof![Just(LineEnding::LF), Just(LineEnding::CRLF)].prop_map(Edit::Convert),
    ]
}

/// Batches of edits; the tracker is polled between batches.
fn batches_strategy() -> impl Strategy<Value = Vec<Vec<Edit>>> {
    prop::collection::vec(prop::collection::vec(edit_strategy(), 1..6), 1..8)
}

fn apply(buffer: &mut TextBuffer, edit: &Edit) {
    let len = buffer.len_chars();
    match edit {
        Edit::Insert { at, text } => {
            buffer.insert(at % (len + 1), text).unwrap();
        }
        Edit::Remove { at, len: count } => {
            let start = at % (len + 1);
            let end = (start + count).min(len);
            buffer.remove(start..end).unwrap();
        }
        Edit::Replace {
            at,
            len: count,
            text,
        } => {
            let start = at % (len + 1);
            let end = (start + count).min(len);
            buffer.replace(start..end, text).unwrap();
        }
        Edit::SetText(text) => buffer.set_text(text),
        Edit::Convert(ending) => convert(buffer, *ending),
    }
}

/// Full rescan with the default applied to an empty result.
fn oracle(buffer: &TextBuffer, default: LineEnding) -> LineEndingSet {
    let endings = compute_line_endings(buffer);
    if endings.is_empty() {
        LineEndingSet::single(default)
    } else {
        endings
    }
}

fn settings(debounce: Duration) -> TrackerSettings {
    TrackerSettings {
        default_line_ending: DefaultLineEnding::OsDefault,
        rescan_debounce: debounce,
        platform: Platform::Unix,
    }
}

proptest! {
    #[test]
    fn test_published_set_matches_rescan(
        initial in text_strategy(10),
        batches in batches_strategy(),
    ) {
        let mut buffer = TextBuffer::from_text(&initial);
        let mut tracker = LineEndingTracker::new(LineEndingSet::new(), settings(Duration::ZERO));
        tracker.attach(&mut buffer);
        prop_assert_eq!(*tracker.display(), oracle(&buffer, LineEnding::LF));

        for batch in &batches {
            for edit in batch {
                apply(&mut buffer, edit);
            }
            tracker.poll(&mut buffer);
            prop_assert_eq!(
                *tracker.display(),
                oracle(&buffer, LineEnding::LF),
                "text after batch: {:?}",
                buffer.text()
            );
        }
    }

    #[test]
    fn test_debounced_set_converges(
        initial in text_strategy(10),
        batches in batches_strategy(),
    ) {
        let debounce = Duration::from_millis(40);
        let mut buffer = TextBuffer::from_text(&initial);
        let mut tracker = LineEndingTracker::new(LineEndingSet::new(), settings(debounce));
        tracker.attach(&mut buffer);

        // Polls land inside the debounce window, so rescans keep being pushed back.
        let mut now = Instant::now();
        for batch in &batches {
            for edit in batch {
                apply(&mut buffer, edit);
            }
            tracker.poll_at(&mut buffer, now);
            now += Duration::from_millis(10);
        }

        tracker.poll_at(&mut buffer, now + debounce);
        prop_assert!(!tracker.has_pending_rescan());
        prop_assert_eq!(*tracker.display(), oracle(&buffer, LineEnding::LF));
    }

    #[test]
    fn test_convert_leaves_single_style(
        text in text_strategy(12),
        crlf in any::<bool>(),
    ) {
        let ending = if crlf { LineEnding::CRLF } else { LineEnding::LF };
        let mut buffer = TextBuffer::from_text(&text);

        convert(&mut buffer, ending);

        let endings = compute_line_endings(&buffer);
        prop_assert!(endings.is_empty() || endings == LineEndingSet::single(ending));
        let stripped = buffer.text().replace(ending.as_str(), "");
        prop_assert!(!stripped.contains(['\r', '\n']));
        prop_assert_eq!(buffer.preferred_line_ending(), Some(ending));
    }

    #[test]
    fn test_lf_crlf_round_trip(lines in prop::collection::vec("[a-z ]{0,8}", 1..8)) {
        let original = lines.join("\n");
        let mut buffer = TextBuffer::from_text(&original);

        convert(&mut buffer, LineEnding::CRLF);
        convert(&mut buffer, LineEnding::LF);

        prop_assert_eq!(buffer.text(), original);
    }
}
