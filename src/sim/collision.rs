//! Ball-ball collision detection and response
//!
//! Overlap is corrected positionally first, then an impulse is applied along
//! the contact normal. Mass is approximated by radius squared.

use glam::Vec2;
use rand::Rng;

use super::ball::Ball;
use crate::consts::OVERLAP_EPSILON;
use crate::tuning::Tuning;
use crate::{limit_speed, unit_from_angle};

/// Result of a ball-ball overlap check
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Unit normal from the first ball toward the second
    pub normal: Vec2,
    /// Center distance before correction
    pub distance: f32,
    /// Penetration depth (sum of radii minus distance)
    pub overlap: f32,
    /// Centers (nearly) coincide; `normal` was picked at random
    pub degenerate: bool,
}

/// Check whether two balls overlap
///
/// Coincident centers get a random normal instead of a division by zero.
pub fn detect_contact(a: &Ball, b: &Ball, rng: &mut impl Rng) -> Option<Contact> {
    let delta = b.pos - a.pos;
    let distance = delta.length();
    let reach = a.radius + b.radius;

    if distance >= reach {
        return None;
    }

    let degenerate = distance < OVERLAP_EPSILON;
    let normal = if degenerate {
        unit_from_angle(rng.random::<f32>() * std::f32::consts::TAU)
    } else {
        delta / distance
    };

    Some(Contact {
        normal,
        distance,
        overlap: reach - distance,
        degenerate,
    })
}

/// Push two overlapping balls apart until they just touch
///
/// Each ball moves by the share of the overlap proportional to the other
/// ball's radius, so the larger ball moves less.
pub fn resolve_overlap(a: &mut Ball, b: &mut Ball, contact: &Contact) {
    let (share_a, share_b) = if contact.degenerate {
        (0.5, 0.5)
    } else {
        let sum = a.radius + b.radius;
        (b.radius / sum, a.radius / sum)
    };

    a.pos -= contact.normal * contact.overlap * share_a;
    b.pos += contact.normal * contact.overlap * share_b;
}

/// Exchange momentum along the contact normal
///
/// Returns false when the balls are already separating. The impulse is
/// divided by each ball's mass and multiplied back by the same mass, so both
/// balls receive the full impulse as a velocity change.
pub fn resolve_impulse(a: &mut Ball, b: &mut Ball, contact: &Contact, tuning: &Tuning) -> bool {
    let n = contact.normal;
    let velocity_along_normal = (b.vel - a.vel).dot(n);

    if velocity_along_normal > 0.0 {
        return false;
    }

    let m1 = Tuning::mass_of(a.radius);
    let m2 = Tuning::mass_of(b.radius);
    let j = -(1.0 + tuning.restitution) * velocity_along_normal / (1.0 / m1 + 1.0 / m2);
    let impulse = n * j;

    a.vel -= (impulse / m1) * m1;
    b.vel += (impulse / m2) * m2;

    a.vel = limit_speed(a.vel, tuning.max_speed);
    b.vel = limit_speed(b.vel, tuning.max_speed);
    true
}

/// Points earned by one frame of contact
#[inline]
pub fn contact_score(a: &Ball, b: &Ball, multiplier: u64) -> u64 {
    (a.tier as u64 + b.tier as u64) * multiplier
}

/// Full response for one pair: detect, separate, score, impulse
///
/// Returns the score earned, or None if the balls don't touch.
pub fn collide_pair(
    a: &mut Ball,
    b: &mut Ball,
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> Option<u64> {
    let contact = detect_contact(a, b, rng)?;
    resolve_overlap(a, b, &contact);
    let points = contact_score(a, b, tuning.score_multiplier);
    resolve_impulse(a, b, &contact, tuning);
    Some(points)
}

/// Run the pairwise pass over every unordered pair of collidable balls
///
/// Returns the total score earned this frame.
pub fn collide_all(balls: &mut [Ball], tuning: &Tuning, rng: &mut impl Rng) -> u64 {
    let mut points = 0;
    for i in 0..balls.len() {
        let (head, tail) = balls.split_at_mut(i + 1);
        let a = &mut head[i];
        if !a.is_collidable() {
            continue;
        }
        for b in tail.iter_mut() {
            if !b.is_collidable() {
                continue;
            }
            if let Some(earned) = collide_pair(a, b, tuning, rng) {
                points += earned;
            }
        }
    }
    points
}
