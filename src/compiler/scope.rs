//! Compile-time scope tracking
//!
//! A stack of frames recording which variable and function names are in
//! scope. Lookups walk the stack outward, so an inner frame sees names
//! declared by every enclosing frame. Library frames are merged into their
//! parent on pop: functions defined by an included library stay callable
//! for the rest of the program.

/// What introduced a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Root,
    Function,
    Foreach,
    Library,
}

#[derive(Debug)]
struct Frame {
    #[allow(dead_code)]
    name: String,
    kind: FrameKind,
    variables: Vec<String>,
    functions: Vec<String>,
}

/// The scope stack used during compilation
#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<Frame>,
    /// Libraries already compiled into the program (include-once)
    included: Vec<String>,
}

impl ScopeStack {
    /// Create the root scope, pre-seeding caller-reserved variable names
    pub fn new(reserved: &[String]) -> Self {
        Self {
            frames: vec![Frame {
                name: "root".to_string(),
                kind: FrameKind::Root,
                variables: reserved.iter().map(|r| r.trim().to_string()).collect(),
                functions: Vec::new(),
            }],
            included: Vec::new(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, kind: FrameKind) {
        self.frames.push(Frame {
            name: name.into(),
            kind,
            variables: Vec::new(),
            functions: Vec::new(),
        });
    }

    /// Pop the innermost frame. Functions declared by a library frame are
    /// hoisted into the parent so they survive the pop.
    pub fn pop(&mut self) {
        if self.frames.len() == 1 {
            return; // the root frame is permanent
        }
        if let Some(frame) = self.frames.pop() {
            if frame.kind == FrameKind::Library {
                if let Some(parent) = self.frames.last_mut() {
                    parent.functions.extend(frame.functions);
                    parent.variables.extend(frame.variables);
                }
            }
        }
    }

    pub fn declare_variable(&mut self, name: &str) {
        if let Some(frame) = self.frames.last_mut() {
            frame.variables.push(name.to_string());
        }
    }

    pub fn declare_function(&mut self, name: &str) {
        if let Some(frame) = self.frames.last_mut() {
            frame.functions.push(name.to_string());
        }
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.frames
            .iter()
            .rev()
            .any(|frame| frame.variables.iter().any(|v| v == name))
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.frames
            .iter()
            .rev()
            .any(|frame| frame.functions.iter().any(|f| f == name))
    }

    /// Record a library as compiled; returns false if it already was
    pub fn mark_included(&mut self, name: &str) -> bool {
        if self.included.iter().any(|lib| lib == name) {
            return false;
        }
        self.included.push(name.to_string());
        true
    }
}
