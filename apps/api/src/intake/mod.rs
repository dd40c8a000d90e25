// Resume intake: file uploads and the live preview heuristics.
// Binary documents are never parsed; the user is asked to paste text instead.

pub mod preview;
pub mod upload;
