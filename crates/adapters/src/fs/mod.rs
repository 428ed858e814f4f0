mod clock;
mod scanner;

pub use clock::SystemClock;
pub use scanner::WalkdirPhotoScanner;
