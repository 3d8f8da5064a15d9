// Resume file selection: validation, the Idle/Selected/Uploading/Success/Error
// lifecycle, and the simulated upload that completes it.
// Presentation (banners, drag highlighting, shortcuts) belongs to the client.

pub mod controller;
pub mod format;
pub mod handlers;
pub mod models;
pub mod registry;
pub mod session;
pub mod sweeper;
pub mod upload;
pub mod validation;
