/// Opacity and marker scale for one rendered word.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VisualWeight {
    pub opacity: f32,
    pub scale: f32,
}

pub const ACTIVE_OPACITY: f32 = 0.5;
pub const SELECTED_OPACITY: f32 = 1.0;
pub const AWAITING_OPACITY: f32 = 0.25;
pub const SELECTED_SCALE: f32 = 1.2;

/// Visual weight as a pure function of the word's state.
///
/// `awaiting` covers both a stale point and any point displayed while a fetch
/// is in flight; it dims the word regardless of selection.
pub fn visual_weight(awaiting: bool, selected: bool) -> VisualWeight {
    let opacity = if awaiting {
        AWAITING_OPACITY
    } else if selected {
        SELECTED_OPACITY
    } else {
        ACTIVE_OPACITY
    };
    let scale = if selected { SELECTED_SCALE } else { 1.0 };
    VisualWeight { opacity, scale }
}

#[cfg(test)]
mod tests {
    use super::visual_weight;

    #[test]
    fn opacity_table() {
        assert_eq!(visual_weight(false, false).opacity, 0.5);
        assert_eq!(visual_weight(false, true).opacity, 1.0);
        assert_eq!(visual_weight(true, false).opacity, 0.25);
        assert_eq!(visual_weight(true, true).opacity, 0.25);
    }

    #[test]
    fn selection_enlarges_marker() {
        assert_eq!(visual_weight(true, true).scale, 1.2);
        assert_eq!(visual_weight(false, false).scale, 1.0);
    }
}
