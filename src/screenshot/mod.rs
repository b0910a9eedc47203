pub mod imgbb;
pub mod publisher;
pub mod resolver;

pub use imgbb::ImgBbHost;
pub use publisher::{ImageHost, PublishedScreenshot, ScreenshotPublisher, UploadOutcome};
pub use resolver::{screenshot_prefix, Screenshot, ScreenshotResolver};
