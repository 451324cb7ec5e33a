pub mod input;
pub mod interaction;
pub mod menu;
pub mod session;
pub mod shortcuts;

pub use input::{InputEvent, Modifiers, PointerButton};
pub use interaction::{EditorAction, InteractionState, Mode, WHEEL_PAN_SPEED};
pub use menu::{MenuState, PASTE_LINE_STEP};
pub use session::EditorSession;
pub use shortcuts::{ShortcutAction, ShortcutMap};
