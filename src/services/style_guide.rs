/// Supplies the style-guide text injected into every generation prompt.
/// Resolution never fails; an unreadable source falls back to the next one.
pub trait StyleGuideResolver: Send + Sync {
    fn resolve(&self) -> String;
}
