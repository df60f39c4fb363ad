pub mod bucket;
pub mod folders;
pub mod get;
pub mod init;
pub mod put;
pub mod tree;
pub mod version;

pub use bucket::Bucket;
pub use folders::Folders;
pub use get::Get;
pub use init::Init;
pub use put::Put;
pub use tree::Tree;
pub use version::Version;
