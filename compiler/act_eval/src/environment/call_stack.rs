//! Call-frame tracking.

use std::time::Instant;

use act_ir::ActionId;
use smallvec::SmallVec;

use super::LocalScope;
use crate::errors::{stack_overflow, BacktraceFrame, EvalBacktrace, EvalError};
use crate::value::Value;

/// One active call.
#[derive(Clone, Debug)]
pub struct CallFrame {
    pub name: String,
    /// Argument values as passed.
    pub args: SmallVec<[Value; 4]>,
    /// The `call` node that entered this frame, when there is one.
    pub call_node: Option<ActionId>,
    pub entered_at: Instant,
}

impl CallFrame {
    pub fn new(name: impl Into<String>, args: &[Value], call_node: Option<ActionId>) -> Self {
        CallFrame {
            name: name.into(),
            args: args.iter().cloned().collect(),
            call_node,
            entered_at: Instant::now(),
        }
    }
}

/// Live call stack of one engine.
///
/// Independent of the lexical chain: every context created during an
/// execution shares the same stack. The depth limit is checked on
/// [`push`](Self::push), so runaway recursion surfaces as a catchable
/// `RangeError` instead of exhausting the host stack.
#[derive(Clone, Debug)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: usize,
}

/// The call stack as shared between contexts.
pub type SharedCallStack = LocalScope<CallStack>;

impl CallStack {
    pub fn new(max_depth: usize) -> Self {
        CallStack {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a frame. The frame is not pushed when the limit is reached.
    pub fn push(&mut self, frame: CallFrame) -> Result<(), EvalError> {
        if self.frames.len() >= self.max_depth {
            return Err(stack_overflow(self.max_depth));
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<CallFrame> {
        self.frames.pop()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
    }

    /// Frames, oldest first.
    pub fn frames(&self) -> &[CallFrame] {
        &self.frames
    }

    pub fn current_frame(&self) -> Option<&CallFrame> {
        self.frames.last()
    }

    /// Drop every frame.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Snapshot for diagnostics, most recent call first.
    pub fn capture(&self) -> EvalBacktrace {
        EvalBacktrace::new(
            self.frames
                .iter()
                .rev()
                .map(|frame| BacktraceFrame {
                    name: frame.name.clone(),
                    call_node: frame.call_node,
                })
                .collect(),
        )
    }
}
