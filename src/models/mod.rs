pub mod entry;
pub mod loaders;

pub use entry::{EntryId, EntryStatus, ImageEntry, ImageSource, PreviewRef};
pub use loaders::{image_media_type, load_url_manifest, scan_image_folder};
