use crate::error::StackError;

pub const STACK_SIZE: usize = 0x10;

/// Bounded return-address stack. Held apart from program memory so the
/// interpreted program can never alias it through `I`.
#[derive(Debug, Default)]
pub struct CallStack {
    frames: [u16; STACK_SIZE],
    depth: usize,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, addr: u16) -> Result<(), StackError> {
        if self.depth == STACK_SIZE {
            return Err(StackError::Full);
        }
        self.frames[self.depth] = addr;
        self.depth += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, StackError> {
        if self.depth == 0 {
            return Err(StackError::Empty);
        }
        self.depth -= 1;
        Ok(self.frames[self.depth])
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::{CallStack, STACK_SIZE};
    use crate::error::StackError;

    #[test]
    fn test_push_pop_is_lifo() {
        let mut stack = CallStack::new();
        stack.push(0x200).unwrap();
        stack.push(0x300).unwrap();
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.pop(), Ok(0x300));
        assert_eq!(stack.pop(), Ok(0x200));
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_push_full_stack() {
        let mut stack = CallStack::new();
        for i in 0..STACK_SIZE {
            stack.push(i as u16).unwrap();
        }
        assert_eq!(stack.push(0xFFF), Err(StackError::Full));
        assert_eq!(stack.depth(), STACK_SIZE);
    }

    #[test]
    fn test_pop_empty_stack() {
        let mut stack = CallStack::new();
        assert_eq!(stack.pop(), Err(StackError::Empty));
    }
}
