use anyhow::Result;
use geom::LonLat;

/// Geolocation collaborator: a rough position for the current user, looked up once at
/// startup to center the map. Failures are expected (offline, no provider configured) and
/// never fatal.
pub trait Locator {
    fn locate(&self) -> Result<LonLat>;
}

/// Always answers with a fixed position. For tests and hosts that already know where the
/// user is.
pub struct FixedLocator(pub LonLat);

impl Locator for FixedLocator {
    fn locate(&self) -> Result<LonLat> {
        Ok(self.0)
    }
}
