//! Tests for the tick phases and the `Sim` orchestrator.

use std::time::Duration;

use cpm_core::{
    Demographic, DemographicProfile, DemographicRegistry, ManualClock, ModelConfig, ParticleId,
    Segment, TargetId, Tick, Vec2,
};
use cpm_entity::{Boundary, DeathMarker, Particle, PopulationStats, Target};

use crate::{NoopObserver, Sim, SimBuilder, SimObserver, TickReport};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn adult(id: u32, x: f64, y: f64) -> Particle {
    Particle::new(ParticleId(id), Vec2::new(x, y), DemographicProfile::adult())
}

fn target(id: u32, x: f64, y: f64) -> Target {
    Target { id: TargetId(id), position: Vec2::new(x, y) }
}

fn wall(id: u32, x1: f64, y1: f64, x2: f64, y2: f64) -> Boundary {
    Boundary { id: cpm_core::BoundaryId(id), segment: Segment::from_coords(x1, y1, x2, y2) }
}

fn assert_vec_close(actual: Vec2, expected: Vec2) {
    assert!(actual.distance(expected) < 1e-9, "expected {expected}, got {actual}");
}

fn build(config: ModelConfig, registry: DemographicRegistry) -> (Sim<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let sim = SimBuilder::new(config)
        .registry(registry)
        .clock(clock.clone())
        .build()
        .unwrap();
    (sim, clock)
}

fn adult_sim() -> (Sim<ManualClock>, ManualClock) {
    let config = ModelConfig::default();
    let registry = config.registry();
    build(config, registry)
}

/// Four walls 0.1 m from `centre` on every side.  A particle there touches
/// all four, and the outward pushes cancel so it cannot escape.  Keep
/// `centre` at the origin so the four pushes cancel exactly.
fn add_cage(sim: &mut Sim<ManualClock>, centre: Vec2) {
    let (x, y) = (centre.x, centre.y);
    sim.add_boundary(Segment::from_coords(x - 0.1, y - 0.5, x - 0.1, y + 0.5));
    sim.add_boundary(Segment::from_coords(x + 0.1, y - 0.5, x + 0.1, y + 0.5));
    sim.add_boundary(Segment::from_coords(x - 0.5, y - 0.1, x + 0.5, y - 0.1));
    sim.add_boundary(Segment::from_coords(x - 0.5, y + 0.1, x + 0.5, y + 0.1));
}

/// Profile used by the crush scenarios: with r_min 0.25, dt = 0.25 / (2 · 1.5)
/// and a caged particle dies on its fifth tick.
fn crush_profile() -> DemographicProfile {
    DemographicProfile {
        r_min:            0.25,
        stress_threshold: 2.0,
        crush_threshold:  3,
        ..DemographicProfile::adult()
    }
}

fn crush_config() -> ModelConfig {
    ModelConfig { stress_rate: 5.0, ..ModelConfig::default() }
}

/// The exit corridor used by the population-level tests.
fn corridor(sim: &mut Sim<ManualClock>) {
    sim.add_boundary(Segment::from_coords(1.0, 1.0, 15.0, 1.0));
    sim.add_boundary(Segment::from_coords(1.0, 1.0, 1.0, 10.0));
    sim.add_boundary(Segment::from_coords(1.0, 10.0, 15.0, 10.0));
    sim.add_boundary(Segment::from_coords(15.0, 1.0, 16.0, 3.0));
    sim.add_boundary(Segment::from_coords(15.0, 10.0, 16.0, 8.0));
    sim.add_target(Vec2::new(17.0, 3.0));
    sim.add_target(Vec2::new(17.0, 8.0));
    for i in 0..8 {
        let x = 2.5 + 1.5 * f64::from(i);
        let y = if i % 2 == 0 { 3.0 } else { 7.0 };
        sim.add_particles_with_demographics(Vec2::new(x, y), 5).unwrap();
    }
    sim.assign_targets();
}

fn populated_corridor() -> Sim<ManualClock> {
    let (mut sim, _) = build(ModelConfig { stress_rate: 5.0, ..ModelConfig::default() }, DemographicRegistry::standard());
    corridor(&mut sim);
    sim
}

// ── Contact resolution ────────────────────────────────────────────────────────

#[cfg(test)]
mod contact_tests {
    use super::*;
    use crate::phase::{contact, radius};

    #[test]
    fn overlapping_pair_touches_both_and_stays_compressed() {
        let mut ps = vec![adult(0, 0.0, 0.0), adult(1, 0.1, 0.0)];
        contact::resolve(&mut ps, &[]);

        assert!(ps[0].in_contact && ps[1].in_contact);
        assert_eq!(ps[0].contacts, 1);
        assert_eq!(ps[1].contacts, 1);

        radius::adjust(&mut ps, 0.5, 0.05);
        assert_eq!(ps[0].radius, 0.2);
        assert_eq!(ps[1].radius, 0.2);
    }

    #[test]
    fn escape_points_away_at_profile_speed() {
        let mut ps = vec![adult(0, 0.0, 0.0), adult(1, 0.1, 0.0)];
        contact::resolve(&mut ps, &[]);
        assert_vec_close(ps[0].escape.vector, Vec2::new(-1.5, 0.0));
        assert_vec_close(ps[1].escape.vector, Vec2::new(1.5, 0.0));
        assert_eq!(ps[0].escape.magnitude, 1.5);
    }

    #[test]
    fn escape_includes_own_desired_velocity() {
        let mut ps = vec![adult(0, 0.0, 0.0), adult(1, 0.3, 0.0)];
        // Particle 0 walks into particle 1 hard enough to beat the push back.
        ps[0].desired.vector = Vec2::new(3.0, 0.0);
        contact::resolve(&mut ps, &[]);
        assert_vec_close(ps[0].escape.vector, Vec2::new(1.5, 0.0));
        assert_vec_close(ps[1].escape.vector, Vec2::new(1.5, 0.0));
    }

    #[test]
    fn contact_is_symmetric_across_a_cluster() {
        let mut ps = vec![adult(0, 0.0, 0.0), adult(1, 0.3, 0.0), adult(2, 0.15, 0.2), adult(3, 5.0, 5.0)];
        contact::resolve(&mut ps, &[]);
        assert_eq!(ps.iter().map(|p| p.contacts).collect::<Vec<_>>(), [2, 2, 2, 0]);
        assert!(!ps[3].in_contact);
        assert_eq!(ps[3].escape.vector, Vec2::ZERO);
    }

    #[test]
    fn separated_discs_are_not_in_contact() {
        let mut ps = vec![adult(0, 0.0, 0.0), adult(1, 0.45, 0.0)];
        contact::resolve(&mut ps, &[]);
        assert!(!ps[0].in_contact);
        assert!(!ps[1].in_contact);
    }

    #[test]
    fn coincident_centres_count_but_add_no_direction() {
        let mut ps = vec![adult(0, 1.0, 1.0), adult(1, 1.0, 1.0)];
        contact::resolve(&mut ps, &[]);
        assert!(ps[0].in_contact && ps[1].in_contact);
        assert_eq!(ps[0].contacts, 1);
        assert_eq!(ps[0].escape.vector, Vec2::ZERO);
        assert_eq!(ps[0].escape.magnitude, 0.0);
        assert!(ps.iter().all(|p| p.escape.vector.x.is_finite()));
    }

    #[test]
    fn wall_pushes_outward() {
        let mut ps = vec![adult(0, 0.0, 0.1)];
        contact::resolve(&mut ps, &[wall(0, -1.0, 0.0, 1.0, 0.0)]);
        assert!(ps[0].in_contact);
        assert_eq!(ps[0].contacts, 1);
        assert_vec_close(ps[0].escape.vector, Vec2::new(0.0, 1.5));
    }

    #[test]
    fn wall_endpoint_pushes_radially() {
        let mut ps = vec![adult(0, 1.1, 0.1)];
        contact::resolve(&mut ps, &[wall(0, -1.0, 0.0, 1.0, 0.0)]);
        let e = ps[0].escape.vector;
        assert!((e.x - e.y).abs() < 1e-12, "expected 45°, got {e}");
        assert!((e.length() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn distant_wall_ignored() {
        let mut ps = vec![adult(0, 0.0, 0.3)];
        contact::resolve(&mut ps, &[wall(0, -1.0, 0.0, 1.0, 0.0)]);
        assert!(!ps[0].in_contact);
    }

    #[test]
    fn previous_contacts_are_cleared() {
        let mut ps = vec![adult(0, 0.0, 0.0), adult(1, 0.1, 0.0)];
        contact::resolve(&mut ps, &[]);
        ps[1].position = Vec2::new(5.0, 0.0);
        contact::resolve(&mut ps, &[]);
        assert!(!ps[0].in_contact);
        assert_eq!(ps[0].contacts, 0);
        assert_eq!(ps[0].escape.vector, Vec2::ZERO);
    }
}

// ── Radius, targeting, velocity, integration, stress ─────────────────────────

#[cfg(test)]
mod phase_tests {
    use super::*;
    use crate::phase::{arrival, integrate, radius, stress, targeting, velocity};

    #[test]
    fn free_particle_regrows_linearly_then_caps() {
        let mut ps = vec![adult(0, 0.0, 0.0)];
        radius::adjust(&mut ps, 0.5, 0.1);
        // r_max / tau · dt = 0.8 / 0.5 · 0.1 = 0.16
        assert!((ps[0].radius - 0.36).abs() < 1e-12);
        for _ in 0..10 {
            radius::adjust(&mut ps, 0.5, 0.1);
        }
        assert_eq!(ps[0].radius, 0.8);
    }

    #[test]
    fn nearest_target_with_tie_to_lowest_index() {
        let targets = [target(0, 10.0, 0.0), target(1, -10.0, 0.0), target(2, 0.0, 3.0)];
        assert_eq!(targeting::nearest(Vec2::ZERO, &targets), Some(TargetId(2)));
        assert_eq!(targeting::nearest(Vec2::ZERO, &targets[..2]), Some(TargetId(0)));
        assert_eq!(targeting::nearest(Vec2::ZERO, &[]), None);
    }

    #[test]
    fn compressed_particle_has_zero_desired_speed() {
        let mut ps = vec![adult(0, 0.0, 0.0)];
        let targets = [target(0, 5.0, 0.0)];
        targeting::assign_nearest(&mut ps, &targets);
        velocity::plan(&mut ps, &targets, 1.0);
        assert_eq!(ps[0].desired.magnitude, 0.0);
        assert_eq!(ps[0].desired.vector, Vec2::ZERO);
    }

    #[test]
    fn desired_speed_follows_radius_law() {
        let mut ps = vec![adult(0, 0.0, 0.0)];
        ps[0].radius = 0.5; // halfway between 0.2 and 0.8
        let targets = [target(0, 0.0, 5.0)];
        targeting::assign_nearest(&mut ps, &targets);

        velocity::plan(&mut ps, &targets, 1.0);
        assert!((ps[0].desired.magnitude - 0.75).abs() < 1e-12);
        assert!((ps[0].desired.vector.y - 0.75).abs() < 1e-12);
        assert_eq!(ps[0].desired.vector.x, 0.0);

        velocity::plan(&mut ps, &targets, 2.0);
        assert!((ps[0].desired.magnitude - 0.375).abs() < 1e-12);
    }

    #[test]
    fn no_target_or_on_target_gives_zero_velocity() {
        let mut ps = vec![adult(0, 0.0, 0.0), adult(1, 2.0, 2.0)];
        ps[0].radius = 0.8;
        ps[1].radius = 0.8;
        ps[0].desired.vector = Vec2::new(1.0, 1.0);
        velocity::plan(&mut ps, &[], 1.0);
        assert_eq!(ps[0].desired.vector, Vec2::ZERO);

        let targets = [target(0, 2.0, 2.0)];
        targeting::assign_nearest(&mut ps, &targets);
        velocity::plan(&mut ps, &targets, 1.0);
        assert_eq!(ps[1].desired.vector, Vec2::ZERO);
    }

    #[test]
    fn integrator_picks_velocity_by_regime() {
        let mut ps = vec![adult(0, 0.0, 0.0), adult(1, 0.0, 0.0)];
        for p in &mut ps {
            p.desired.vector = Vec2::new(1.0, 0.0);
            p.escape.vector = Vec2::new(0.0, -1.0);
        }
        ps[0].radius = 0.3;
        integrate::advance(&mut ps, 0.5);
        assert_eq!(ps[0].position, Vec2::new(0.5, 0.0));
        assert_eq!(ps[1].position, Vec2::new(0.0, -0.5));
    }

    #[test]
    fn stress_accrues_when_crushed_and_decays_to_zero() {
        let mut ps = vec![adult(0, 0.0, 0.0)];
        ps[0].contacts = 4; // adult crush threshold
        stress::accrue(&mut ps, 2.0, 0.1);
        assert!((ps[0].stress - 0.2).abs() < 1e-12);

        ps[0].contacts = 3;
        stress::accrue(&mut ps, 2.0, 0.1);
        assert!((ps[0].stress - 0.1).abs() < 1e-12);
        stress::accrue(&mut ps, 2.0, 0.1);
        stress::accrue(&mut ps, 2.0, 0.1);
        assert_eq!(ps[0].stress, 0.0);
        assert!(!ps[0].dead);
    }

    #[test]
    fn dead_flag_is_sticky() {
        let mut ps = vec![adult(0, 0.0, 0.0)];
        ps[0].stress = 2.95;
        ps[0].contacts = 4;
        assert_eq!(stress::accrue(&mut ps, 1.0, 0.1), 1);
        ps[0].contacts = 0;
        stress::accrue(&mut ps, 1.0, 0.1);
        assert!(ps[0].dead);
    }

    #[test]
    fn arrival_requires_assigned_target_within_radius() {
        let targets = [target(0, 0.0, 0.0)];
        let mut p = adult(0, 0.5, 0.0);
        assert!(!arrival::has_arrived(&p, &targets, 0.5));
        p.target = Some(TargetId(0));
        assert!(arrival::has_arrived(&p, &targets, 0.5));
        p.position = Vec2::new(0.51, 0.0);
        assert!(!arrival::has_arrived(&p, &targets, 0.5));
        p.target = Some(TargetId(7));
        assert!(!arrival::has_arrived(&p, &targets, 100.0));
    }
}

// ── Scene building ────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use cpm_core::CpmError;

    use super::*;
    use crate::SimError;

    #[test]
    fn builds_with_defaults() {
        let sim = SimBuilder::new(ModelConfig::default()).build().unwrap();
        assert!((sim.dt() - 0.2 / 3.0).abs() < 1e-12);
        assert_eq!(sim.tick(), Tick::ZERO);
        assert!(sim.particles().is_empty());
        assert_eq!(sim.registry().len(), 1);
    }

    #[test]
    fn invalid_config_rejected() {
        let config = ModelConfig { tau: 0.0, ..ModelConfig::default() };
        assert!(SimBuilder::new(config).build().is_err());

        let result = SimBuilder::new(ModelConfig::default())
            .registry(DemographicRegistry::new())
            .build();
        assert!(matches!(result, Err(SimError::Core(CpmError::Config(_)))));
    }

    #[test]
    fn unregistered_demographic_is_rejected_before_spawning() {
        let (mut sim, _) = adult_sim();
        let err = sim.add_particle(Vec2::ZERO, Demographic::Youth).unwrap_err();
        assert!(matches!(err, SimError::Core(CpmError::UnregisteredDemographic(Demographic::Youth))));
        assert!(sim.particles().is_empty());
        assert_eq!(sim.stats().total().created, 0);
    }

    #[test]
    fn unknown_demographic_name_is_rejected() {
        let (mut sim, _) = adult_sim();
        let err = sim.add_particle_named(Vec2::ZERO, "toddler").unwrap_err();
        assert!(matches!(err, SimError::Core(CpmError::UnknownDemographic(_))));
        sim.add_particle_named(Vec2::ZERO, "adult").unwrap();
        assert_eq!(sim.stats().total().created, 1);
    }

    #[test]
    fn particle_copies_its_profile() {
        let (mut sim, _) = build(ModelConfig::default(), DemographicRegistry::standard());
        let id = sim.add_particle(Vec2::new(1.0, 1.0), Demographic::Elderly).unwrap();
        let p = sim.particle(id).unwrap();
        assert_eq!(p.profile, DemographicProfile::elderly());
        assert_eq!(p.radius, 0.18);
        assert_eq!(sim.stats().demographic(Demographic::Elderly).unwrap().current, 1);
    }

    #[test]
    fn proportional_spawning_is_jittered_and_seeded() {
        let centre = Vec2::new(5.0, 5.0);
        let spawn = || {
            let (mut sim, _) = build(ModelConfig::default(), DemographicRegistry::standard());
            sim.add_particles_with_demographics(centre, 50).unwrap();
            sim
        };
        let a = spawn();
        let b = spawn();

        assert_eq!(a.particles().len(), 50);
        assert_eq!(a.particles(), b.particles());
        for p in a.particles() {
            assert!((p.position.x - centre.x).abs() <= 0.25 + 1e-12);
            assert!((p.position.y - centre.y).abs() <= 0.25 + 1e-12);
        }
        assert!(a.stats().is_balanced());
        let by_demo: u64 = a.stats().by_demographic().iter().map(|(_, c)| c.created).sum();
        assert_eq!(by_demo, 50);
    }

    #[test]
    fn assign_targets_before_first_step() {
        let (mut sim, _) = adult_sim();
        sim.add_target(Vec2::new(10.0, 0.0));
        sim.add_target(Vec2::new(0.0, 2.0));
        let id = sim.add_particle(Vec2::ZERO, Demographic::Adult).unwrap();
        assert_eq!(sim.particle(id).unwrap().target, None);
        sim.assign_targets();
        assert_eq!(sim.particle(id).unwrap().target, Some(TargetId(1)));
    }
}

// ── Ticks ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tick_tests {
    use super::*;

    #[test]
    fn particle_near_target_arrives_and_latches_completion() {
        let (mut sim, clock) = adult_sim();
        sim.add_target(Vec2::new(0.3, 0.0));
        sim.add_particle(Vec2::ZERO, Demographic::Adult).unwrap();
        clock.set(Duration::from_secs(2));
        sim.start();
        clock.set(Duration::from_secs(5));

        let report = sim.step();
        assert_eq!(report.arrivals, 1);
        assert_eq!(report.active, 0);
        assert!(sim.particles().is_empty());

        let total = sim.stats().total();
        assert_eq!((total.reached_target, total.current, total.died), (1, 0, 0));
        assert_eq!(sim.completed_tick(), Some(Tick(0)));
        assert_eq!(sim.completed_at(), Some(Duration::from_secs(5)));
        assert_eq!(sim.elapsed(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn completion_latches_once() {
        let (mut sim, clock) = adult_sim();
        sim.add_target(Vec2::new(0.3, 0.0));
        sim.add_particle(Vec2::ZERO, Demographic::Adult).unwrap();
        clock.set(Duration::from_secs(1));
        sim.step();
        clock.set(Duration::from_secs(9));
        sim.step();
        sim.step();
        assert_eq!(sim.completed_at(), Some(Duration::from_secs(1)));
        assert_eq!(sim.completed_tick(), Some(Tick(0)));
    }

    #[test]
    fn empty_model_never_completes() {
        let (mut sim, _) = adult_sim();
        sim.run_ticks(3, &mut NoopObserver);
        assert!(!sim.is_complete());
        assert_eq!(sim.tick(), Tick(3));
    }

    #[test]
    fn particle_without_targets_stays_put() {
        let (mut sim, _) = adult_sim();
        let id = sim.add_particle(Vec2::new(3.0, 4.0), Demographic::Adult).unwrap();
        sim.run_ticks(20, &mut NoopObserver);
        let p = sim.particle(id).unwrap();
        assert_eq!(p.position, Vec2::new(3.0, 4.0));
        assert_eq!(p.radius, 0.8);
        assert_eq!(p.target, None);
    }

    #[test]
    fn sustained_crush_kills_after_expected_ticks() {
        let (mut sim, _) = build(crush_config(), DemographicRegistry::single(crush_profile()));
        let centre = Vec2::ZERO;
        add_cage(&mut sim, centre);
        let id = sim.add_particle(centre, Demographic::Adult).unwrap();

        let expected = (2.0 / (5.0 * sim.dt())).ceil() as u64;
        assert_eq!(expected, 5);

        let mut last_stress = 0.0;
        for _ in 0..expected - 1 {
            sim.step();
            let p = sim.particle(id).expect("still alive");
            assert_eq!(p.contacts, 4);
            assert!(p.stress > last_stress, "stress must rise while crushed");
            assert_eq!(p.position, centre);
            last_stress = p.stress;
        }

        let report = sim.step();
        assert_eq!(report.deaths, 1);
        assert!(sim.particle(id).is_none());
        assert_eq!(sim.stats().total().died, 1);
        assert_eq!(
            sim.death_markers(),
            &[DeathMarker {
                particle:    id,
                position:    centre,
                demographic: Demographic::Adult,
                tick:        Tick(expected - 1),
            }]
        );
        assert_eq!(sim.completed_tick(), Some(Tick(expected - 1)));
    }

    /// Steps a particle caged at the origin until it is purged and returns
    /// the number of ticks taken.
    fn ticks_until_crushed(r_min: f64) -> u64 {
        let profile = DemographicProfile { r_min, ..crush_profile() };
        let (mut sim, _) = build(crush_config(), DemographicRegistry::single(profile));
        add_cage(&mut sim, Vec2::ZERO);
        let id = sim.add_particle(Vec2::ZERO, Demographic::Adult).unwrap();
        let mut ticks = 0;
        while sim.particle(id).is_some() && ticks < 100 {
            sim.step();
            ticks += 1;
        }
        ticks
    }

    #[test]
    fn crush_time_exact_when_threshold_divides_evenly() {
        // 2.0 / (5.0 · r_min / 3.0) is a whole number of ticks for each of these.
        assert_eq!(ticks_until_crushed(0.2), 6);
        assert_eq!(ticks_until_crushed(0.12), 10);
        assert_eq!(ticks_until_crushed(0.15), 8);
        assert_eq!(ticks_until_crushed(0.24), 5);
        assert_eq!(ticks_until_crushed(0.3), 4);
    }

    #[test]
    fn crush_time_rounds_up_otherwise() {
        assert_eq!(ticks_until_crushed(0.25), 5);
        assert_eq!(ticks_until_crushed(0.18), 7);
    }

    #[test]
    fn death_preempts_arrival_in_same_tick() {
        let profile = DemographicProfile { stress_threshold: 0.1, ..crush_profile() };
        let (mut sim, _) = build(crush_config(), DemographicRegistry::single(profile));
        let centre = Vec2::ZERO;
        add_cage(&mut sim, centre);
        sim.add_target(Vec2::new(0.0, 0.05));
        sim.add_particle(centre, Demographic::Adult).unwrap();

        let report = sim.step();
        assert_eq!((report.deaths, report.arrivals), (1, 0));
        let total = sim.stats().total();
        assert_eq!((total.died, total.reached_target), (1, 0));
        assert!(sim.is_complete());
    }

    #[test]
    fn squeezed_pair_separates() {
        let (mut sim, _) = adult_sim();
        let a = sim.add_particle(Vec2::new(0.0, 0.0), Demographic::Adult).unwrap();
        let b = sim.add_particle(Vec2::new(0.1, 0.0), Demographic::Adult).unwrap();
        sim.step();
        let (pa, pb) = (sim.particle(a).unwrap(), sim.particle(b).unwrap());
        assert!(pa.in_contact && pb.in_contact);
        assert!(pa.position.x < 0.0);
        assert!(pb.position.x > 0.1);
    }

    #[test]
    fn invariants_hold_every_tick_in_a_crowd() {
        let mut sim = populated_corridor();
        assert_eq!(sim.stats().total().created, 40);
        for _ in 0..400 {
            sim.step();
            for p in sim.particles() {
                assert!(p.radius >= p.profile.r_min && p.radius <= p.profile.r_max, "radius {}", p.radius);
                assert!(p.stress >= 0.0);
                assert!(!p.dead);
            }
            assert!(sim.stats().is_balanced());
            assert_eq!(sim.stats().total().current as usize, sim.particles().len());
            assert_eq!(sim.stats().total().died as usize, sim.death_markers().len());
        }
    }

    #[test]
    fn identical_setups_produce_identical_runs() {
        let mut a = populated_corridor();
        let mut b = populated_corridor();
        for _ in 0..300 {
            let ra = a.step();
            let rb = b.step();
            assert_eq!(ra, rb);
        }
        assert_eq!(a.particles(), b.particles());
        assert_eq!(a.death_markers(), b.death_markers());
        assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn crowd_drains_through_exits() {
        let mut sim = populated_corridor();
        let done = sim.run_until_complete(20_000, &mut NoopObserver);
        assert!(done.is_some(), "crowd did not drain: {:?}", sim.stats().total());
        let total = sim.stats().total();
        assert_eq!(total.reached_target + total.died, 40);
        assert!(sim.particles().is_empty());
    }

    #[test]
    fn reset_clears_everything() {
        let mut sim = populated_corridor();
        sim.start();
        sim.run_ticks(200, &mut NoopObserver);
        sim.reset();

        assert!(sim.particles().is_empty());
        assert!(sim.boundaries().is_empty());
        assert!(sim.targets().is_empty());
        assert!(sim.death_markers().is_empty());
        assert_eq!(*sim.stats().total(), Default::default());
        assert!(sim.stats().by_demographic().iter().all(|(_, c)| *c == Default::default()));
        assert_eq!(sim.tick(), Tick::ZERO);
        assert_eq!(sim.started_at(), None);
        assert_eq!(sim.completed_at(), None);

        sim.reset();
        assert!(sim.particles().is_empty());
    }

    #[test]
    fn reset_replays_the_same_population() {
        let mut sim = populated_corridor();
        let before: Vec<Particle> = sim.particles().to_vec();
        sim.run_ticks(50, &mut NoopObserver);
        sim.reset();
        corridor(&mut sim);
        assert_eq!(sim.particles(), before.as_slice());
    }

    #[test]
    fn start_stamps_only_once() {
        let (mut sim, clock) = adult_sim();
        assert_eq!(sim.elapsed(), None);
        clock.set(Duration::from_secs(4));
        assert_eq!(sim.start(), Duration::from_secs(4));
        clock.set(Duration::from_secs(6));
        assert_eq!(sim.start(), Duration::from_secs(4));
        assert_eq!(sim.elapsed(), Some(Duration::from_secs(2)));
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        starts:    Vec<Tick>,
        reports:   Vec<TickReport>,
        deaths:    Vec<DeathMarker>,
        snapshots: Vec<(Tick, usize)>,
        completed: Vec<Tick>,
        ended:     Option<Tick>,
    }

    impl SimObserver for Recorder {
        fn on_tick_start(&mut self, tick: Tick) {
            self.starts.push(tick);
        }
        fn on_death(&mut self, _tick: Tick, marker: &DeathMarker) {
            self.deaths.push(*marker);
        }
        fn on_tick_end(&mut self, report: &TickReport, stats: &PopulationStats) {
            assert!(stats.is_balanced());
            self.reports.push(*report);
        }
        fn on_snapshot(&mut self, tick: Tick, particles: &[Particle]) {
            self.snapshots.push((tick, particles.len()));
        }
        fn on_complete(&mut self, tick: Tick, _at: Duration) {
            self.completed.push(tick);
        }
        fn on_sim_end(&mut self, final_tick: Tick) {
            self.ended = Some(final_tick);
        }
    }

    #[test]
    fn hooks_fire_in_tick_order() {
        let clock = ManualClock::new();
        let mut sim = SimBuilder::new(ModelConfig::default())
            .clock(clock)
            .snapshot_interval(2)
            .build()
            .unwrap();
        sim.add_particle(Vec2::ZERO, Demographic::Adult).unwrap();

        let mut rec = Recorder::default();
        sim.run_ticks(5, &mut rec);

        assert_eq!(rec.starts, [Tick(0), Tick(1), Tick(2), Tick(3), Tick(4)]);
        assert_eq!(rec.reports.len(), 5);
        assert!(rec.reports.iter().all(|r| r.active == 1));
        assert!((rec.reports[4].sim_time_secs - 5.0 * sim.dt()).abs() < 1e-12);
        assert_eq!(rec.snapshots, [(Tick(0), 1), (Tick(2), 1), (Tick(4), 1)]);
        assert!(rec.completed.is_empty());
        assert_eq!(rec.ended, None);
    }

    #[test]
    fn deaths_and_completion_reported() {
        let (mut sim, _) = build(crush_config(), DemographicRegistry::single(crush_profile()));
        add_cage(&mut sim, Vec2::ZERO);
        sim.add_particle(Vec2::ZERO, Demographic::Adult).unwrap();

        let mut rec = Recorder::default();
        let done = sim.run_until_complete(100, &mut rec);

        assert_eq!(done, Some(Tick(4)));
        assert_eq!(rec.deaths.len(), 1);
        assert_eq!(rec.deaths[0].tick, Tick(4));
        assert_eq!(rec.completed, [Tick(4)]);
        assert_eq!(rec.ended, Some(Tick(5)));
        assert_eq!(rec.reports.last().map(|r| r.deaths), Some(1));
    }
}

// ── Frame scheduler ───────────────────────────────────────────────────────────

#[cfg(test)]
mod scheduler_tests {
    use super::*;
    use crate::FrameScheduler;

    #[test]
    fn rejects_non_positive_speed() {
        assert!(FrameScheduler::new(0.0).is_err());
        assert!(FrameScheduler::new(-1.0).is_err());
        assert!(FrameScheduler::new(f64::NAN).is_err());
    }

    #[test]
    fn first_frame_only_marks_time() {
        let mut sched = FrameScheduler::new(1.0).unwrap();
        assert_eq!(sched.steps_due(Duration::from_secs(10), 0.1), 0);
        assert_eq!(sched.steps_due(Duration::from_millis(10_350), 0.1), 3);
    }

    #[test]
    fn partial_ticks_carry_over() {
        let mut sched = FrameScheduler::new(0.5).unwrap();
        sched.steps_due(Duration::ZERO, 0.1);
        // one tick per 50 ms of wall time
        assert_eq!(sched.steps_due(Duration::from_millis(30), 0.1), 0);
        assert_eq!(sched.steps_due(Duration::from_millis(60), 0.1), 1);
        assert_eq!(sched.steps_due(Duration::from_millis(270), 0.1), 4);
    }

    #[test]
    fn pause_discards_idle_time() {
        let mut sched = FrameScheduler::new(1.0).unwrap();
        sched.steps_due(Duration::ZERO, 0.1);
        sched.pause();
        assert_eq!(sched.steps_due(Duration::from_secs(60), 0.1), 0);
        assert_eq!(sched.steps_due(Duration::from_millis(60_250), 0.1), 2);
    }

    #[test]
    fn advance_runs_due_ticks_on_sim() {
        let (mut sim, clock) = adult_sim();
        let mut sched = FrameScheduler::new(1.0).unwrap();
        assert_eq!(sched.advance(&mut sim, &mut NoopObserver), 0);
        clock.advance(Duration::from_secs_f64(sim.dt() * 7.5));
        assert_eq!(sched.advance(&mut sim, &mut NoopObserver), 7);
        assert_eq!(sim.tick(), Tick(7));
    }
}
