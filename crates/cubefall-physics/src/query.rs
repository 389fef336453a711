use cubefall_geom::Vec3;

/// Identifies a collider. Cubes of one rigid group share a body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

impl BodyId {
    pub const FLOOR: BodyId = BodyId(0);
    /// Cubes the player is placing during the current countdown.
    pub const PENDING: BodyId = BodyId(1);
    /// First id free for shape groups.
    pub const FIRST_GROUP: u32 = 2;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub body: BodyId,
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueryFilter {
    pub ignore: Option<BodyId>,
}

impl QueryFilter {
    pub const fn none() -> Self {
        Self { ignore: None }
    }

    pub const fn excluding(body: BodyId) -> Self {
        Self { ignore: Some(body) }
    }

    #[inline]
    pub fn accepts(&self, body: BodyId) -> bool {
        self.ignore != Some(body)
    }
}

/// The physics capability the simulation consumes: cast a ray or a box and
/// get the first hit back.
pub trait CollisionWorld {
    fn raycast(&self, origin: Vec3, dir: Vec3, max_dist: f32, filter: QueryFilter) -> Option<Hit>;

    fn boxcast(
        &self,
        origin: Vec3,
        half_extents: Vec3,
        dir: Vec3,
        max_dist: f32,
        filter: QueryFilter,
    ) -> Option<Hit>;
}

/// Keeps the nearer of two optional hits.
#[inline]
pub fn nearer(a: Option<Hit>, b: Option<Hit>) -> Option<Hit> {
    match (a, b) {
        (Some(x), Some(y)) => Some(if y.distance < x.distance { y } else { x }),
        (x, None) => x,
        (None, y) => y,
    }
}
