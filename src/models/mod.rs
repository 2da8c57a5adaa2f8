pub mod booking;
pub mod intent;
pub mod tile;
pub mod turn;

pub use booking::{derive_status, BookingStatus};
pub use intent::{BookingCategory, BookingIntent, IntentKind};
pub use tile::{render_tile, TileAction, TileView};
pub use turn::{Speaker, Turn};
