//! Evaluation errors.
//!
//! Every failure inside the engine is one [`EvalError`]: structural
//! problems with the tree, scope violations, type and range errors raised
//! by operators and built-ins, call-depth exhaustion and user `throw`s.
//! Keeping them in one type is what lets a script-level `catch` intercept
//! any of them except the structural ones.
//!
//! Factory functions (e.g. [`undefined_reference`]) are the construction
//! API; each fills in the matching [`EvalErrorKind`].

use std::fmt;

use act_ir::ActionId;

use crate::coerce;
use crate::environment::ScopeError;
use crate::value::{PropertyMap, Value};

/// Result of evaluating an expression.
pub type EvalResult = Result<Value, EvalError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Structural: the tree breaks the engine's input contract
    UnknownActionType {
        tag: String,
    },
    MissingAttribute {
        tag: String,
        attribute: String,
    },
    MissingChild {
        tag: String,
        role: String,
    },
    InvalidStructure {
        message: String,
    },

    // Scope
    UndefinedReference {
        name: String,
    },
    DuplicateDeclaration {
        name: String,
    },
    ConstAssignment {
        name: String,
    },

    // Type/Syntax/Range
    NotCallable {
        callee: String,
    },
    PropertyOfNullish {
        property: String,
        base: String,
    },
    TypeError {
        message: String,
    },
    SyntaxError {
        message: String,
    },
    RangeError {
        message: String,
    },

    // Resource
    StackOverflow {
        depth: usize,
    },

    /// A script-level `throw`; the value lives on [`EvalError::thrown`].
    Thrown,
}

impl EvalErrorKind {
    /// Whether this kind is a violation of the tree contract.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::UnknownActionType { .. }
                | Self::MissingAttribute { .. }
                | Self::MissingChild { .. }
                | Self::InvalidStructure { .. }
        )
    }

    /// Script-visible error class, for kinds raised by the engine itself.
    pub fn error_name(&self) -> Option<&'static str> {
        match self {
            Self::UndefinedReference { .. } => Some("ReferenceError"),
            Self::DuplicateDeclaration { .. } | Self::SyntaxError { .. } => Some("SyntaxError"),
            Self::ConstAssignment { .. }
            | Self::NotCallable { .. }
            | Self::PropertyOfNullish { .. }
            | Self::TypeError { .. } => Some("TypeError"),
            Self::RangeError { .. } | Self::StackOverflow { .. } => Some("RangeError"),
            Self::UnknownActionType { .. }
            | Self::MissingAttribute { .. }
            | Self::MissingChild { .. }
            | Self::InvalidStructure { .. }
            | Self::Thrown => None,
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownActionType { tag } => write!(f, "unknown action type `{tag}`"),
            Self::MissingAttribute { tag, attribute } => {
                write!(f, "`{tag}` node is missing required attribute `{attribute}`")
            }
            Self::MissingChild { tag, role } => {
                write!(f, "`{tag}` node is missing its {role} child")
            }
            Self::InvalidStructure { message } => write!(f, "{message}"),

            Self::UndefinedReference { name } => write!(f, "{name} is not defined"),
            Self::DuplicateDeclaration { name } => {
                write!(f, "Identifier '{name}' has already been declared")
            }
            Self::ConstAssignment { name } => {
                write!(f, "Assignment to constant variable '{name}'")
            }

            Self::NotCallable { callee } => write!(f, "{callee} is not a function"),
            Self::PropertyOfNullish { property, base } => {
                write!(f, "Cannot read properties of {base} (reading '{property}')")
            }
            Self::TypeError { message }
            | Self::SyntaxError { message }
            | Self::RangeError { message } => write!(f, "{message}"),

            Self::StackOverflow { depth } => {
                write!(f, "Maximum call stack size exceeded (limit: {depth})")
            }
            Self::Thrown => write!(f, "uncaught exception"),
        }
    }
}

/// One frame of a captured backtrace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    /// Function name, `<anonymous>` when it has none.
    pub name: String,
    /// The `call` node that entered the frame.
    pub call_node: Option<ActionId>,
}

/// Snapshot of the call stack at an error site, most recent call first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl EvalBacktrace {
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// One display line per frame.
    pub fn lines(&self) -> Vec<String> {
        self.frames
            .iter()
            .map(|frame| match frame.call_node {
                Some(node) => format!("{} (called at {node})", frame.name),
                None => frame.name.clone(),
            })
            .collect()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "call backtrace:")?;
        for (i, line) in self.lines().iter().enumerate() {
            writeln!(f, "  {i}: {line}")?;
        }
        Ok(())
    }
}

/// Evaluation error.
#[derive(Clone, Debug)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Innermost node being evaluated when the error was raised.
    pub node: Option<ActionId>,
    pub backtrace: Option<EvalBacktrace>,
    /// The value of a script-level `throw`.
    pub thrown: Option<Value>,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind) -> Self {
        EvalError {
            kind,
            node: None,
            backtrace: None,
            thrown: None,
        }
    }

    /// Wrap a thrown script value.
    pub fn thrown(value: Value) -> Self {
        EvalError {
            thrown: Some(value),
            ..Self::new(EvalErrorKind::Thrown)
        }
    }

    /// Record the originating node unless an inner node already did.
    #[must_use]
    pub fn at_node(mut self, node: ActionId) -> Self {
        if self.node.is_none() {
            self.node = Some(node);
        }
        self
    }

    /// Attach a backtrace unless one was captured closer to the error.
    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        if self.backtrace.is_none() && !backtrace.is_empty() {
            self.backtrace = Some(backtrace);
        }
        self
    }

    pub fn is_structural(&self) -> bool {
        self.kind.is_structural()
    }

    /// Whether a script-level `catch` may intercept this error.
    pub fn is_catchable(&self) -> bool {
        !self.kind.is_structural()
    }

    pub fn error_name(&self) -> Option<&'static str> {
        self.kind.error_name()
    }

    /// Human-readable message. For throws this is the thrown value rendered
    /// the way an uncaught exception would print it.
    pub fn message(&self) -> String {
        match &self.thrown {
            Some(value) => describe_thrown(value),
            None => self.kind.to_string(),
        }
    }

    /// The value a `catch` clause binds.
    ///
    /// Thrown values are bound as-is; engine errors become a
    /// `{ name, message }` object.
    pub fn to_catch_value(&self) -> Value {
        if let Some(value) = &self.thrown {
            return value.clone();
        }
        let name = self.error_name().unwrap_or("Error");
        let mut props = PropertyMap::new();
        props.set("name", Value::string(name));
        props.set("message", Value::string(self.kind.to_string()));
        Value::object(props)
    }
}

/// Render a thrown value: error-like objects as `Name: message`.
fn describe_thrown(value: &Value) -> String {
    if let Value::Object(obj) = value {
        let obj = obj.borrow();
        if let Some(message) = obj.get("message") {
            let message = coerce::to_display_string(message);
            return match obj.get("name") {
                Some(name) => format!("{}: {message}", coerce::to_display_string(name)),
                None => message,
            };
        }
    }
    coerce::to_display_string(value)
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error_name() {
            Some(name) => write!(f, "{name}: {}", self.message())?,
            None => write!(f, "{}", self.message())?,
        }
        if let Some(node) = self.node {
            write!(f, " (at {node})")?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

impl From<ScopeError> for EvalError {
    fn from(err: ScopeError) -> Self {
        match err {
            ScopeError::DuplicateDeclaration(name) => duplicate_declaration(&name),
            ScopeError::UndefinedReference(name) => undefined_reference(&name),
            ScopeError::ConstAssignment(name) => const_assignment(&name),
        }
    }
}

// Structural

#[cold]
pub fn unknown_action_type(tag: &str) -> EvalError {
    EvalError::new(EvalErrorKind::UnknownActionType {
        tag: tag.to_string(),
    })
}

#[cold]
pub fn missing_attribute(tag: &str, attribute: &str) -> EvalError {
    EvalError::new(EvalErrorKind::MissingAttribute {
        tag: tag.to_string(),
        attribute: attribute.to_string(),
    })
}

#[cold]
pub fn missing_child(tag: &str, role: &str) -> EvalError {
    EvalError::new(EvalErrorKind::MissingChild {
        tag: tag.to_string(),
        role: role.to_string(),
    })
}

#[cold]
pub fn invalid_structure(message: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::InvalidStructure {
        message: message.into(),
    })
}

/// A control signal reached a construct that cannot consume it.
#[cold]
pub fn unexpected_signal(signal: &str) -> EvalError {
    invalid_structure(format!("`{signal}` outside of an enclosing construct that accepts it"))
}

// Scope

#[cold]
pub fn undefined_reference(name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::UndefinedReference {
        name: name.to_string(),
    })
}

#[cold]
pub fn duplicate_declaration(name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::DuplicateDeclaration {
        name: name.to_string(),
    })
}

#[cold]
pub fn const_assignment(name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::ConstAssignment {
        name: name.to_string(),
    })
}

// Type/Syntax/Range

#[cold]
pub fn not_callable(callee: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::NotCallable {
        callee: callee.into(),
    })
}

#[cold]
pub fn property_of_nullish(property: &str, base: &Value) -> EvalError {
    EvalError::new(EvalErrorKind::PropertyOfNullish {
        property: property.to_string(),
        base: coerce::to_display_string(base),
    })
}

#[cold]
pub fn type_error(message: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::TypeError {
        message: message.into(),
    })
}

#[cold]
pub fn syntax_error(message: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::SyntaxError {
        message: message.into(),
    })
}

#[cold]
pub fn range_error(message: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::RangeError {
        message: message.into(),
    })
}

// Resource

#[cold]
pub fn stack_overflow(depth: usize) -> EvalError {
    EvalError::new(EvalErrorKind::StackOverflow { depth })
}
