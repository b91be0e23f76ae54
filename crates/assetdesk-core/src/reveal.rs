//! Typewriter reveal of a fully received answer.
//!
//! The backend delivers each answer in one frame; the client discloses it one
//! character per timer tick. [`Reveal`] holds the progress and knows nothing
//! about time: whoever owns the timer calls [`Reveal::tick`] and drops the timer
//! once the reveal reports [`RevealTick::Finished`].

use crate::ids::MessageId;

/// Outcome of a single timer tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealTick {
    /// One more character is visible; `content` is the full visible prefix.
    Advanced {
        target: MessageId,
        content: String,
        ch: char,
    },
    /// Nothing left to reveal. The reveal is now idle.
    Finished { target: MessageId },
    /// No reveal in progress.
    Idle,
}

/// Reveal state: `Idle -> Revealing -> Idle`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Reveal {
    #[default]
    Idle,
    Revealing {
        /// Message whose content is being filled.
        target: MessageId,
        /// Complete answer text.
        full: String,
        /// Byte offset of the end of the visible prefix. Always a char boundary.
        shown: usize,
    },
}

impl Reveal {
    /// Begin revealing `full` into `target`.
    ///
    /// Any reveal already running is abandoned where it stands; its target is
    /// returned so the caller can report it.
    pub fn start(&mut self, target: MessageId, full: String) -> Option<MessageId> {
        let previous = std::mem::replace(
            self,
            Self::Revealing {
                target,
                full,
                shown: 0,
            },
        );
        match previous {
            Self::Revealing { target, .. } => Some(target),
            Self::Idle => None,
        }
    }

    /// Advance by one character, or finish if everything is visible.
    pub fn tick(&mut self) -> RevealTick {
        let Self::Revealing {
            target,
            full,
            shown,
        } = self
        else {
            return RevealTick::Idle;
        };

        let next = full[*shown..].chars().next();
        match next {
            Some(ch) => {
                *shown += ch.len_utf8();
                RevealTick::Advanced {
                    target: target.clone(),
                    content: full[..*shown].to_string(),
                    ch,
                }
            }
            None => {
                let target = target.clone();
                *self = Self::Idle;
                RevealTick::Finished { target }
            }
        }
    }

    /// Stop revealing. Returns the abandoned target, if any.
    pub fn cancel(&mut self) -> Option<MessageId> {
        match std::mem::take(self) {
            Self::Revealing { target, .. } => Some(target),
            Self::Idle => None,
        }
    }

    /// True while a reveal is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Revealing { .. })
    }

    /// Message currently being revealed.
    pub fn target(&self) -> Option<&MessageId> {
        match self {
            Self::Revealing { target, .. } => Some(target),
            Self::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advanced_content(tick: RevealTick) -> String {
        match tick {
            RevealTick::Advanced { content, .. } => content,
            other => panic!("Expected Advanced, got {:?}", other),
        }
    }

    #[test]
    fn test_reveals_one_char_per_tick_then_finishes() {
        let id = MessageId::generate();
        let mut reveal = Reveal::default();
        assert_eq!(reveal.start(id.clone(), "hi\nthere".to_string()), None);

        assert_eq!(advanced_content(reveal.tick()), "h");
        assert_eq!(advanced_content(reveal.tick()), "hi");
        assert_eq!(advanced_content(reveal.tick()), "hi\n");
        for _ in 0..5 {
            reveal.tick();
        }
        assert!(reveal.is_active());
        assert_eq!(reveal.tick(), RevealTick::Finished { target: id });
        assert!(!reveal.is_active());
        assert_eq!(reveal.tick(), RevealTick::Idle);
    }

    #[test]
    fn test_empty_answer_finishes_on_first_tick() {
        let id = MessageId::generate();
        let mut reveal = Reveal::default();
        reveal.start(id.clone(), String::new());
        assert_eq!(reveal.tick(), RevealTick::Finished { target: id });
    }

    #[test]
    fn test_multibyte_chars_are_revealed_whole() {
        let mut reveal = Reveal::default();
        reveal.start(MessageId::generate(), "né✓".to_string());
        assert_eq!(advanced_content(reveal.tick()), "n");
        assert_eq!(advanced_content(reveal.tick()), "né");
        match reveal.tick() {
            RevealTick::Advanced { content, ch, .. } => {
                assert_eq!(content, "né✓");
                assert_eq!(ch, '✓');
            }
            other => panic!("Expected Advanced, got {:?}", other),
        }
    }

    #[test]
    fn test_start_supersedes_running_reveal() {
        let first = MessageId::generate();
        let second = MessageId::generate();
        let mut reveal = Reveal::default();
        reveal.start(first.clone(), "abc".to_string());
        reveal.tick();

        assert_eq!(reveal.start(second.clone(), "xyz".to_string()), Some(first));
        assert_eq!(reveal.target(), Some(&second));
        match reveal.tick() {
            RevealTick::Advanced { target, content, .. } => {
                assert_eq!(target, second);
                assert_eq!(content, "x");
            }
            other => panic!("Expected Advanced, got {:?}", other),
        }
    }

    #[test]
    fn test_cancel() {
        let id = MessageId::generate();
        let mut reveal = Reveal::default();
        assert_eq!(reveal.cancel(), None);
        reveal.start(id.clone(), "abc".to_string());
        assert_eq!(reveal.cancel(), Some(id));
        assert_eq!(reveal.tick(), RevealTick::Idle);
    }
}
