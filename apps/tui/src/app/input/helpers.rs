pub const fn wrap_decrement(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

pub const fn wrap_increment(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    (index + 1) % len
}

/// Moves a table cursor for the navigation keys every list screen shares.
/// Returns `false` for keys that are not table movement.
pub fn move_selection(index: &mut usize, len: usize, key: crossterm::event::KeyCode) -> bool {
    use crossterm::event::KeyCode;

    const PAGE: usize = 5;

    match key {
        KeyCode::Up => *index = wrap_decrement(*index, len),
        KeyCode::Down => *index = wrap_increment(*index, len),
        KeyCode::PageUp => *index = index.saturating_sub(PAGE),
        KeyCode::PageDown => *index = (*index + PAGE).min(len.saturating_sub(1)),
        KeyCode::Home => *index = 0,
        KeyCode::End => *index = len.saturating_sub(1),
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;

    #[test]
    fn wraps_both_ways() {
        assert_eq!(wrap_increment(2, 3), 0);
        assert_eq!(wrap_decrement(0, 3), 2);
        assert_eq!(wrap_increment(0, 0), 0);
    }

    #[test]
    fn paging_stays_in_bounds() {
        let mut index = 3;
        assert!(move_selection(&mut index, 6, KeyCode::PageDown));
        assert_eq!(index, 5);
        assert!(move_selection(&mut index, 6, KeyCode::PageUp));
        assert_eq!(index, 0);
        assert!(move_selection(&mut index, 0, KeyCode::End));
        assert_eq!(index, 0);
        assert!(!move_selection(&mut index, 6, KeyCode::Enter));
    }
}
