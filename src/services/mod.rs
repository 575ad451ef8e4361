pub mod credentials;
pub mod style_guide;
pub mod text_generator;
pub mod version_control;

pub use credentials::CredentialProvider;
pub use style_guide::StyleGuideResolver;
pub use text_generator::TextGeneratorService;
pub use version_control::VersionControlService;
