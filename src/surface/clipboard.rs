use tracing::debug;

/// The single contract the engine needs from a clipboard mechanism.
///
/// The host environment decides how text actually lands on the clipboard
/// (privileged API, native async clipboard, legacy selection trick); the
/// engine only ever looks at the boolean outcome.
pub trait Clipboard: Send + Sync {
    fn name(&self) -> &'static str;

    fn copy(&self, text: &str) -> bool;
}

/// Ordered fallback over several clipboard mechanisms, first success wins.
pub struct TieredClipboard {
    tiers: Vec<Box<dyn Clipboard>>,
}

impl TieredClipboard {
    pub fn new(tiers: Vec<Box<dyn Clipboard>>) -> Self {
        Self { tiers }
    }
}

impl Clipboard for TieredClipboard {
    fn name(&self) -> &'static str {
        "tiered"
    }

    fn copy(&self, text: &str) -> bool {
        for tier in &self.tiers {
            if tier.copy(text) {
                return true;
            }
            debug!("clipboard tier '{}' failed, trying next", tier.name());
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct FixedTier {
        name: &'static str,
        ok: bool,
        calls: AtomicUsize,
    }

    impl FixedTier {
        fn boxed(name: &'static str, ok: bool) -> Box<Self> {
            Box::new(Self {
                name,
                ok,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl Clipboard for FixedTier {
        fn name(&self) -> &'static str {
            self.name
        }

        fn copy(&self, _text: &str) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.ok
        }
    }

    #[test]
    fn test_first_successful_tier_wins() {
        let clipboard = TieredClipboard::new(vec![
            FixedTier::boxed("privileged", false),
            FixedTier::boxed("native", true),
            FixedTier::boxed("legacy", true),
        ]);

        assert!(clipboard.copy("hello"));
    }

    #[test]
    fn test_all_tiers_exhausted_reports_failure() {
        let clipboard = TieredClipboard::new(vec![
            FixedTier::boxed("privileged", false),
            FixedTier::boxed("legacy", false),
        ]);

        assert!(!clipboard.copy("hello"));
    }

    #[test]
    fn test_no_tiers_reports_failure() {
        assert!(!TieredClipboard::new(Vec::new()).copy("hello"));
    }
}
