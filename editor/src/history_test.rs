use super::*;

#[test]
fn undo_redo_flow() {
    let mut history = History::new(vec![1]);
    history.push(vec![1, 2]);
    history.push(vec![1, 2, 3]);

    assert_eq!(history.undo(), Some(vec![1, 2]));
    assert_eq!(history.undo(), Some(vec![1]));
    assert_eq!(history.undo(), None);

    assert_eq!(history.redo(), Some(vec![1, 2]));
    history.push(vec![9]);
    assert_eq!(history.redo(), None);
    assert_eq!(history.undo(), Some(vec![1, 2]));
}

#[test]
fn limit_drops_oldest() {
    let mut history = History::with_limit(0, 3);
    for n in 1..=5 {
        history.push(n);
    }
    assert_eq!(history.len(), 3);
    assert_eq!(history.undo(), Some(4));
    assert_eq!(history.undo(), Some(3));
    assert_eq!(history.undo(), None);
}

#[test]
fn zero_limit_still_keeps_current() {
    let mut history = History::with_limit("a", 0);
    history.push("b");
    assert_eq!(history.len(), 1);
    assert!(!history.can_undo());
}

#[test]
fn reset_clears_stack() {
    let mut history = History::new(1);
    history.push(2);
    history.reset(7);
    assert!(!history.can_undo());
    assert!(!history.can_redo());
    assert_eq!(history.len(), 1);
}
