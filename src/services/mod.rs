pub mod renderer;
pub mod result_writer;
pub mod terminal;

pub use renderer::Renderer;
pub use result_writer::ResultWriter;
pub use terminal::{TerminalPrompt, TerminalRenderer};
