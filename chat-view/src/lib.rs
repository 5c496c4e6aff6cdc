//! Presentation components.
//!
//! Every component is a pure function from a read-only snapshot to the text
//! that goes on screen. Nothing here touches the stores; user actions are
//! parsed by the interactive loop and routed to store operations there.

pub mod chat;
pub mod sidebar;

pub use chat::{render_chat_area, render_input_line, render_message_bubble, render_message_list};
pub use sidebar::{
    Tab, render_chunks, render_conversation_list, render_document_list, render_sidebar,
    render_tab_switcher, render_upload_control,
};

/// Turns ANSI styling on or off for everything rendered afterwards.
pub fn set_color(enabled: bool) {
    colored::control::set_override(enabled);
}
