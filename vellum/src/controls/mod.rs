//! Interactive controls built on [`crate::container::Pane`].

mod button;
mod interaction;
mod label;
mod progress_bar;

pub use button::Button;
pub use interaction::{Interaction, InteractiveSkins, PointerState, SkinState};
pub use label::Label;
pub use progress_bar::{ProgressBar, ProgressTextEmitter};
