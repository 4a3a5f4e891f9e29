use crate::{
    universe::{ObjectId, Universe},
    utils,
};

use ultraviolet::Vec2;

/// Result of an anchor toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorToggle {
    Anchored(ObjectId),
    Released(ObjectId),
}

/// Pins or releases the first object under `point`.
///
/// Bodies are tested before black holes, each in insertion order, and at
/// most one object is toggled. A released object does not get its old
/// velocity back; it drifts off with a random one in `[-release_speed, release_speed]`.
pub fn toggle_anchor_at(
    universe: &mut Universe,
    point: Vec2,
    release_speed: f32,
    rng: &mut fastrand::Rng,
) -> Option<AnchorToggle> {
    let id = universe.hit_test(point)?;
    let body = universe.get_mut(id)?;

    if body.is_anchored() {
        body.release(utils::random_velocity(rng, release_speed));
        log::debug!("released {:?} at ({:.1}, {:.1})", body.kind(), body.pos.x, body.pos.y);
        Some(AnchorToggle::Released(id))
    } else {
        body.anchor();
        log::debug!("anchored {:?} at ({:.1}, {:.1})", body.kind(), body.pos.x, body.pos.y);
        Some(AnchorToggle::Anchored(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{Body, BodyKind};

    fn universe() -> Universe {
        let mut universe = Universe::new();
        for x in [0.0, 100.0] {
            universe.insert(
                Body::new(BodyKind::Planet, Vec2::new(x, 0.0), Vec2::new(3.0, 3.0), 1e4, 10.0, "red")
                    .unwrap(),
            );
        }
        universe
    }

    #[test]
    fn toggles_the_hit_object() {
        let mut universe = universe();
        let mut rng = fastrand::Rng::with_seed(11);

        let toggle = toggle_anchor_at(&mut universe, Vec2::new(98.0, 2.0), 1.0, &mut rng);
        assert_eq!(toggle, Some(AnchorToggle::Anchored(ObjectId::Body(1))));
        assert!(universe.bodies()[1].is_anchored());
        assert_eq!(universe.bodies()[1].vel, Vec2::zero());
        assert!(!universe.bodies()[0].is_anchored());

        let toggle = toggle_anchor_at(&mut universe, Vec2::new(100.0, 0.0), 1.0, &mut rng);
        assert_eq!(toggle, Some(AnchorToggle::Released(ObjectId::Body(1))));
        let released = &universe.bodies()[1];
        assert!(!released.is_anchored());
        assert!(released.vel.x.abs() <= 1.0 && released.vel.y.abs() <= 1.0);
    }

    #[test]
    fn miss_changes_nothing() {
        let mut universe = universe();
        let before = universe.clone();
        let mut rng = fastrand::Rng::with_seed(11);

        assert_eq!(toggle_anchor_at(&mut universe, Vec2::new(50.0, 50.0), 1.0, &mut rng), None);
        assert_eq!(universe, before);
    }

    #[test]
    fn black_holes_can_be_anchored() {
        let mut universe = Universe::new();
        universe.insert(
            Body::new(BodyKind::BlackHole, Vec2::zero(), Vec2::new(1.0, 0.0), 1e8, 60.0, "black").unwrap(),
        );
        let mut rng = fastrand::Rng::with_seed(2);

        let toggle = toggle_anchor_at(&mut universe, Vec2::new(30.0, 0.0), 1.0, &mut rng);
        assert_eq!(toggle, Some(AnchorToggle::Anchored(ObjectId::BlackHole(0))));
        assert!(universe.black_holes()[0].is_anchored());
    }
}
