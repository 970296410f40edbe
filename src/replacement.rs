//! Replacement-selection strategies for unpinning the active tab.
//!
//! When the tab of the currently selected note is removed, a replacement
//! selection is picked by trying an ordered list of candidate strategies
//! until one yields a note. The chains encode the configured unpin behavior
//! together with its fallbacks; an empty result means "no replacement" and
//! the caller resurrects the removed tab instead.

use note_tabs_config::UnpinBehavior;

use crate::last_active::LastActiveQueue;
use crate::tabs::NoteTabs;

/// One way of picking the note to select after the active tab goes away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStrategy {
    /// The last active note, if it still has a tab.
    LastActive,
    /// The tab left of the removed one.
    LeftTab,
    /// The tab right of the removed one.
    RightTab,
}

/// Ordered strategy chain for an unpin behavior.
pub fn strategy_chain(behavior: UnpinBehavior) -> &'static [SelectionStrategy] {
    use SelectionStrategy::*;
    match behavior {
        UnpinBehavior::Keep => &[],
        UnpinBehavior::LastActive => &[LastActive, LeftTab, RightTab, LeftTab],
        UnpinBehavior::LeftTab => &[LeftTab, RightTab, LeftTab],
        UnpinBehavior::RightTab => &[RightTab, LeftTab],
    }
}

/// Try the chain in order against the tab list as it looks BEFORE the
/// removal; `removed_idx` is the position of the tab about to go away.
///
/// The last-active strategy consumes the queue entry it inspects, matching
/// the one-shot nature of the history.
pub fn pick_replacement(
    behavior: UnpinBehavior,
    tabs: &NoteTabs,
    removed_idx: usize,
    removed_id: &str,
    last_active: &mut LastActiveQueue,
) -> Option<String> {
    for strategy in strategy_chain(behavior) {
        let candidate = match strategy {
            SelectionStrategy::LastActive => last_active
                .pop()
                .filter(|id| id != removed_id && tabs.has_tab(id)),
            SelectionStrategy::LeftTab => removed_idx
                .checked_sub(1)
                .and_then(|idx| tabs.get(idx))
                .map(|tab| tab.id.clone()),
            SelectionStrategy::RightTab => tabs
                .get(removed_idx + 1)
                .map(|tab| tab.id.clone()),
        };
        if let Some(id) = candidate {
            return Some(id);
        }
    }
    None
}
