//! Integration tests for the style stack.

use std::rc::Rc;

use paragraph_content::{INLINE_FRAMES, StyleStack};
use quickcheck::quickcheck;

#[test]
fn test_new_stack_holds_container_only() {
    let body = Rc::new("body");
    let stack = StyleStack::new(&body);
    assert_eq!(stack.depth(), 1);
    assert!(!stack.has_open_elements());
    assert!(Rc::ptr_eq(stack.current(), &body));
    assert!(Rc::ptr_eq(stack.container(), &body));
    assert_eq!(Rc::strong_count(&body), 2);
}

#[test]
fn test_iter_runs_bottom_to_top() {
    let styles: Vec<Rc<usize>> = (0..5).map(Rc::new).collect();
    let mut stack = StyleStack::new(&styles[0]);
    for style in &styles[1..] {
        stack.push(style).unwrap();
    }
    let order: Vec<usize> = stack.iter().map(|s| **s).collect();
    assert_eq!(order, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_popped_frame_is_handed_to_caller() {
    let body = Rc::new("body");
    let em = Rc::new("em");
    let mut stack = StyleStack::new(&body);
    stack.push(&em).unwrap();
    let popped = stack.pop().unwrap();
    // The caller now owns the stack's reference.
    assert_eq!(Rc::strong_count(&em), 2);
    drop(popped);
    assert_eq!(Rc::strong_count(&em), 1);
}

#[test]
fn test_unwind_releases_nested_frames() {
    let body = Rc::new("body");
    let span = Rc::new("span");
    let mut stack = StyleStack::new(&body);
    for _ in 0..(INLINE_FRAMES + 3) {
        stack.push(&span).unwrap();
    }
    stack.unwind();
    assert_eq!(stack.depth(), 1);
    assert_eq!(Rc::strong_count(&span), 1);
    assert_eq!(Rc::strong_count(&body), 2);
}

#[test]
fn test_balanced_push_pop_restores_stack() {
    fn prop(depth: u8) -> bool {
        let depth = usize::from(depth % 32);
        let body = Rc::new(0usize);
        let mut stack = StyleStack::new(&body);
        let frames: Vec<Rc<usize>> = (1..=depth).map(Rc::new).collect();
        for frame in &frames {
            if stack.push(frame).is_err() {
                return false;
            }
        }
        let peak_ok = stack.depth() == depth + 1;
        let mut popped_in_order = true;
        for frame in frames.iter().rev() {
            match stack.pop() {
                Some(top) => popped_in_order &= Rc::ptr_eq(&top, frame),
                None => return false,
            }
        }
        peak_ok
            && popped_in_order
            && stack.depth() == 1
            && Rc::ptr_eq(stack.current(), &body)
            && frames.iter().all(|f| Rc::strong_count(f) == 1)
    }
    quickcheck(prop as fn(u8) -> bool);
}
