//! Back-to-front ordering for alpha-blended bodies

use glam::Vec3;

use crate::motion::BodyId;

/// A body drawn in the translucent pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranslucentBody {
    pub id: BodyId,
    pub position: Vec3,
    /// Opacity in [0, 1]
    pub alpha: f32,
}

/// Sort translucent bodies farthest-first from `camera`.
///
/// Equal distances fall back to ascending [`BodyId`], so the order is fully
/// deterministic.
pub fn back_to_front(camera: Vec3, bodies: &[TranslucentBody]) -> Vec<TranslucentBody> {
    let mut keyed: Vec<(f32, TranslucentBody)> = bodies
        .iter()
        .map(|b| (camera.distance(b.position), *b))
        .collect();
    keyed.sort_by(|(da, a), (db, b)| db.total_cmp(da).then_with(|| a.id.cmp(&b.id)));
    keyed.into_iter().map(|(_, b)| b).collect()
}
