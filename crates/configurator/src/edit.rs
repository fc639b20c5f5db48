//! Transient inline editing of a single dimension.
//!
//! Keystrokes only touch the text buffer; nothing reaches the model until
//! the edit is finished (Enter or focus loss). Escape drops the buffer.

use shared::DimensionName;

/// Text being typed for one dimension
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub name: DimensionName,
    pub buffer: String,
}

/// Inline editor state; at most one dimension is edited at a time
#[derive(Debug, Clone, Default)]
pub struct InlineEdit {
    session: Option<EditSession>,
}

impl InlineEdit {
    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    /// Start editing `name`, prefilled with its current value.
    /// Any edit already in progress is dropped.
    pub fn begin(&mut self, name: DimensionName, current: f64) {
        self.session = Some(EditSession {
            name,
            buffer: format_value(current),
        });
    }

    /// Replace the buffer with what the user typed so far.
    /// Returns false when no edit is active.
    pub fn input(&mut self, text: &str) -> bool {
        match self.session.as_mut() {
            Some(session) => {
                session.buffer.clear();
                session.buffer.push_str(text);
                true
            }
            None => false,
        }
    }

    /// End the edit and hand back what should be committed
    pub fn finish(&mut self) -> Option<EditSession> {
        self.session.take()
    }

    pub fn cancel(&mut self) {
        self.session = None;
    }
}

/// Integral values without a fractional part, others as typed by `{}`
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_prefills_value() {
        let mut edit = InlineEdit::default();
        edit.begin(DimensionName::Length, 120.0);
        assert_eq!(edit.session().unwrap().buffer, "120");

        edit.begin(DimensionName::Radius, 2.5);
        assert_eq!(edit.session().unwrap().name, DimensionName::Radius);
        assert_eq!(edit.session().unwrap().buffer, "2.5");
    }

    #[test]
    fn test_input_then_finish() {
        let mut edit = InlineEdit::default();
        edit.begin(DimensionName::Width, 80.0);
        assert!(edit.input("9"));
        assert!(edit.input("95"));
        let session = edit.finish().unwrap();
        assert_eq!(session.buffer, "95");
        assert!(!edit.is_editing());
    }

    #[test]
    fn test_cancel_discards() {
        let mut edit = InlineEdit::default();
        edit.begin(DimensionName::Height, 40.0);
        edit.input("400");
        edit.cancel();
        assert_eq!(edit.finish(), None);
    }

    #[test]
    fn test_input_without_session() {
        let mut edit = InlineEdit::default();
        assert!(!edit.input("12"));
        assert!(edit.finish().is_none());
    }
}
