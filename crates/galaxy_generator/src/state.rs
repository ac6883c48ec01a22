/// Where a galaxy is in its generate / dispose / regenerate cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum GalaxyState {
    /// Nothing has been built yet, so there is nothing to dispose.
    #[default]
    Uninitialized,
    Generated,
    /// Old resources are released and new ones are being built.
    Regenerating,
}

impl GalaxyState {
    /// Whether entering regeneration has to release a previous mesh and material.
    pub fn owns_resources(self) -> bool {
        self == GalaxyState::Generated
    }

    pub fn begin_regeneration(self) -> Self {
        GalaxyState::Regenerating
    }

    pub fn finish_regeneration(self) -> Self {
        GalaxyState::Generated
    }
}
