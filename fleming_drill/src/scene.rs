//! Scene construction for the apparatus and the hand reference model
//!
//! Layout is computed first as plain data (`SceneLayout`) so it can be
//! checked without a GPU, then tessellated into mesh triangles, line
//! segments and screen labels.

use std::f32::consts::TAU;

use common::{LineVertex, MeshVertex};
use glam::Vec3;

use crate::direction::{CurrentDirection, Direction, FactorKind, FieldDirection};
use crate::quiz::Scenario;

/// Colors used across the scene (RGBA)
pub mod palette {
    pub const NORTH: [f32; 4] = [1.0, 0.302, 0.302, 1.0];
    pub const SOUTH: [f32; 4] = [0.302, 0.580, 1.0, 1.0];
    pub const UNKNOWN: [f32; 4] = [0.533, 0.533, 0.533, 1.0];
    pub const FORCE: [f32; 4] = [0.961, 0.620, 0.043, 1.0];
    pub const CURRENT: [f32; 4] = [0.231, 0.510, 0.965, 1.0];
    pub const FIELD: [f32; 4] = [0.133, 0.773, 0.369, 1.0];
    pub const WIRE: [f32; 4] = [0.898, 0.906, 0.922, 1.0];
    pub const SKIN: [f32; 4] = [0.957, 0.647, 0.510, 1.0];
    pub const THUMB: [f32; 4] = [1.0, 0.851, 0.239, 1.0];
    pub const THUMB_HIGHLIGHT: [f32; 4] = [1.0, 0.420, 0.420, 1.0];
    pub const FIRST_FINGER: [f32; 4] = [0.584, 0.882, 0.827, 1.0];
    pub const FIRST_FINGER_HIGHLIGHT: [f32; 4] = [0.420, 0.812, 0.498, 1.0];
    pub const SECOND_FINGER: [f32; 4] = [0.659, 0.855, 0.863, 1.0];
    pub const SECOND_FINGER_HIGHLIGHT: [f32; 4] = [0.302, 0.588, 1.0, 1.0];
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}

const SEGMENTS: usize = 16;

pub const MAGNET_OFFSET: f32 = 2.5;
pub const MAGNET_HALF_EXTENTS: Vec3 = Vec3::new(0.5, 0.75, 0.75);
pub const WIRE_HALF_LENGTH: f32 = 4.0;
pub const WIRE_RADIUS: f32 = 0.2;
pub const ARROW_LENGTH: f32 = 2.0;
pub const FIELD_LINE_LENGTH: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pole {
    North,
    South,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Magnet {
    pub center: Vec3,
    /// `None` while the field is the hidden factor
    pub pole: Option<Pole>,
}

impl Magnet {
    pub fn color(&self) -> [f32; 4] {
        match self.pole {
            Some(Pole::North) => palette::NORTH,
            Some(Pole::South) => palette::SOUTH,
            None => palette::UNKNOWN,
        }
    }

    pub fn label(&self) -> &'static str {
        match self.pole {
            Some(Pole::North) => "N",
            Some(Pole::South) => "S",
            None => "?",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowStyle {
    /// Thick shaft and cone head
    Solid,
    /// Thin line arrow, used for field lines
    Line,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    pub kind: FactorKind,
    pub start: Vec3,
    pub direction: Direction,
    pub length: f32,
    pub style: ArrowStyle,
    pub color: [f32; 4],
    pub label: Option<String>,
}

impl Arrow {
    pub fn tip(&self) -> Vec3 {
        self.start + self.direction.axis() * self.length
    }
}

/// The "?" placed where the hidden factor would be drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub kind: FactorKind,
    pub position: Vec3,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// White text on a colored tag
    Tag,
    /// Large text drawn on a magnet face
    Pole,
    /// Oversized question mark
    Marker,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneLabel {
    pub position: Vec3,
    pub text: String,
    pub color: [f32; 4],
    pub style: LabelStyle,
}

/// Apparatus description for one scenario
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLayout {
    pub magnets: [Magnet; 2],
    pub wire: (Vec3, Vec3),
    pub arrows: Vec<Arrow>,
    pub marker: Marker,
}

/// Lay out magnets, wire, the visible arrows and the hidden-factor marker
pub fn apparatus_layout(scenario: &Scenario) -> SceneLayout {
    let field_visible = !scenario.is_hidden(FactorKind::Field);
    let field_right = scenario.field() == FieldDirection::Right;

    // Field runs from north to south, so the magnet it leaves is north
    let pole = |north: bool| {
        field_visible.then_some(if north { Pole::North } else { Pole::South })
    };
    let magnets = [
        Magnet {
            center: Vec3::new(-MAGNET_OFFSET, 0.0, 0.0),
            pole: pole(field_right),
        },
        Magnet {
            center: Vec3::new(MAGNET_OFFSET, 0.0, 0.0),
            pole: pole(!field_right),
        },
    ];

    let mut arrows = Vec::new();

    if !scenario.is_hidden(FactorKind::Force) {
        arrows.push(Arrow {
            kind: FactorKind::Force,
            start: Vec3::ZERO,
            direction: scenario.force().into(),
            length: ARROW_LENGTH,
            style: ArrowStyle::Solid,
            color: palette::FORCE,
            label: Some("Force".to_owned()),
        });
    }

    if !scenario.is_hidden(FactorKind::Current) {
        let direction = Direction::from(scenario.current());
        let label = match scenario.current() {
            CurrentDirection::Out => "Current (Out)",
            CurrentDirection::In => "Current (In)",
        };
        // Centre the arrow on the wire, lifted just above it
        arrows.push(Arrow {
            kind: FactorKind::Current,
            start: Vec3::new(0.0, 0.3, 0.0) - direction.axis() * (ARROW_LENGTH * 0.5),
            direction,
            length: ARROW_LENGTH,
            style: ArrowStyle::Solid,
            color: palette::CURRENT,
            label: Some(label.to_owned()),
        });
    }

    if field_visible {
        let direction = Direction::from(scenario.field());
        for y in [0.6f32, -0.6] {
            arrows.push(Arrow {
                kind: FactorKind::Field,
                start: direction.opposite().axis() * (FIELD_LINE_LENGTH * 0.5) + Vec3::Y * y,
                direction,
                length: FIELD_LINE_LENGTH,
                style: ArrowStyle::Line,
                color: palette::FIELD,
                label: None,
            });
        }
    }

    let marker = match scenario.hidden() {
        FactorKind::Force => Marker {
            kind: FactorKind::Force,
            position: Vec3::new(0.0, 1.5, 0.0),
            color: palette::FORCE,
        },
        FactorKind::Current => Marker {
            kind: FactorKind::Current,
            position: Vec3::new(0.0, 0.5, 0.0),
            color: palette::CURRENT,
        },
        FactorKind::Field => Marker {
            kind: FactorKind::Field,
            position: Vec3::ZERO,
            color: palette::UNKNOWN,
        },
    };

    SceneLayout {
        magnets,
        wire: (
            Vec3::new(0.0, 0.0, -WIRE_HALF_LENGTH),
            Vec3::new(0.0, 0.0, WIRE_HALF_LENGTH),
        ),
        arrows,
        marker,
    }
}

impl SceneLayout {
    pub fn tessellate(&self) -> SceneGeometry {
        let mut geometry = SceneGeometry::default();

        for magnet in &self.magnets {
            geometry.push_box(magnet.center, MAGNET_HALF_EXTENTS, magnet.color());
            geometry.labels.push(SceneLabel {
                position: magnet.center + Vec3::Z * (MAGNET_HALF_EXTENTS.z + 0.05),
                text: magnet.label().to_owned(),
                color: palette::WHITE,
                style: LabelStyle::Pole,
            });
        }

        geometry.push_cylinder(self.wire.0, self.wire.1, WIRE_RADIUS, palette::WIRE);

        for arrow in &self.arrows {
            let axis = arrow.direction.axis();
            match arrow.style {
                ArrowStyle::Solid => {
                    geometry.push_arrow(arrow.start, axis, arrow.length, 0.15, 0.4, arrow.color)
                }
                ArrowStyle::Line => {
                    geometry.push_line_arrow(arrow.start, axis, arrow.length, 0.6, 0.3, arrow.color)
                }
            }

            if let Some(text) = &arrow.label {
                geometry.labels.push(SceneLabel {
                    position: arrow.tip() + axis * 0.5,
                    text: text.clone(),
                    color: arrow.color,
                    style: LabelStyle::Tag,
                });
            }
        }

        geometry.labels.push(SceneLabel {
            position: self.marker.position,
            text: "?".to_owned(),
            color: self.marker.color,
            style: LabelStyle::Marker,
        });

        geometry
    }
}

/// Fingers of the left hand and the factor each one points along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Thumb,
    First,
    Second,
}

impl Finger {
    pub const ALL: [Finger; 3] = [Finger::Thumb, Finger::First, Finger::Second];

    pub fn factor(self) -> FactorKind {
        match self {
            Finger::Thumb => FactorKind::Force,
            Finger::First => FactorKind::Field,
            Finger::Second => FactorKind::Current,
        }
    }

    pub fn for_factor(kind: FactorKind) -> Finger {
        match kind {
            FactorKind::Force => Finger::Thumb,
            FactorKind::Field => Finger::First,
            FactorKind::Current => Finger::Second,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Finger::Thumb => "Thumb",
            Finger::First => "First Finger",
            Finger::Second => "Second Finger",
        }
    }

    /// What the finger stands for
    pub fn meaning(self) -> &'static str {
        match self {
            Finger::Thumb => "Force/Motion",
            Finger::First => "Magnetic Field",
            Finger::Second => "Current",
        }
    }

    /// Pointing direction in the reference pose (force = current × field)
    pub fn pointing(self) -> Direction {
        match self {
            Finger::Thumb => Direction::Up,
            Finger::First => Direction::Right,
            Finger::Second => Direction::Out,
        }
    }

    fn color(self, highlighted: bool) -> [f32; 4] {
        match (self, highlighted) {
            (Finger::Thumb, false) => palette::THUMB,
            (Finger::Thumb, true) => palette::THUMB_HIGHLIGHT,
            (Finger::First, false) => palette::FIRST_FINGER,
            (Finger::First, true) => palette::FIRST_FINGER_HIGHLIGHT,
            (Finger::Second, false) => palette::SECOND_FINGER,
            (Finger::Second, true) => palette::SECOND_FINGER_HIGHLIGHT,
        }
    }

    /// Base on the palm, length and radius
    fn dimensions(self) -> (Vec3, f32, f32) {
        match self {
            Finger::Thumb => (Vec3::new(-0.6, 0.15, -0.7), 1.8, 0.25),
            Finger::First => (Vec3::new(1.0, 0.05, -0.5), 2.0, 0.2),
            Finger::Second => (Vec3::new(0.5, -0.05, 1.0), 2.0, 0.18),
        }
    }
}

/// Stylised left hand in the reference pose, with one finger highlighted
pub fn hand_reference(highlight: Option<FactorKind>) -> SceneGeometry {
    let mut geometry = SceneGeometry::default();

    geometry.push_box(Vec3::ZERO, Vec3::new(1.0, 0.15, 1.0), palette::SKIN);

    for finger in Finger::ALL {
        let highlighted = highlight == Some(finger.factor());
        let color = finger.color(highlighted);
        let (base, length, radius) = finger.dimensions();
        let axis = finger.pointing().axis();

        let knuckle = base + axis * length;
        geometry.push_cylinder(base, knuckle, radius, color);
        geometry.push_cone(knuckle, knuckle + axis * 0.4, radius * 1.1, color);

        geometry.labels.push(SceneLabel {
            position: knuckle + axis * 0.9,
            text: format!("{}: {}", finger.name(), finger.meaning()),
            color,
            style: LabelStyle::Tag,
        });
    }

    // Curled ring and little fingers
    for (base, tip) in [
        (Vec3::new(0.8, -0.15, 0.3), Vec3::new(1.2, -0.6, 0.4)),
        (Vec3::new(0.8, -0.15, 0.7), Vec3::new(1.1, -0.5, 0.9)),
    ] {
        geometry.push_cylinder(base, tip, 0.16, palette::SKIN);
    }

    geometry
}

/// CPU-side geometry ready for upload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneGeometry {
    pub triangles: Vec<MeshVertex>,
    pub lines: Vec<LineVertex>,
    pub labels: Vec<SceneLabel>,
}

impl SceneGeometry {
    fn push_vertex(&mut self, position: Vec3, normal: Vec3, color: [f32; 4]) {
        self.triangles
            .push(MeshVertex::new(position.to_array(), normal.to_array(), color));
    }

    fn push_line(&mut self, from: Vec3, to: Vec3, color: [f32; 4]) {
        self.lines.push(LineVertex {
            position: from.to_array(),
            color,
        });
        self.lines.push(LineVertex {
            position: to.to_array(),
            color,
        });
    }

    /// Flat-shaded quad given in winding order
    fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3, color: [f32; 4]) {
        for index in [0, 1, 2, 0, 2, 3] {
            self.push_vertex(corners[index], normal, color);
        }
    }

    pub fn push_box(&mut self, center: Vec3, half: Vec3, color: [f32; 4]) {
        for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            for sign in [1.0, -1.0] {
                let normal = axis * sign;
                let u = Vec3::new(axis.y, axis.z, axis.x);
                let v = normal.cross(u);
                let face = center + normal * half.dot(axis);
                let du = u * half.dot(u.abs());
                let dv = v * half.dot(v.abs());
                self.push_quad(
                    [face - du - dv, face + du - dv, face + du + dv, face - du + dv],
                    normal,
                    color,
                );
            }
        }
    }

    pub fn push_cylinder(&mut self, start: Vec3, end: Vec3, radius: f32, color: [f32; 4]) {
        let axis = (end - start).normalize_or_zero();
        if axis == Vec3::ZERO {
            return;
        }
        let ring = ring_directions(axis);

        for i in 0..SEGMENTS {
            let (r0, r1) = (ring[i], ring[(i + 1) % SEGMENTS]);
            let (a0, a1) = (start + r0 * radius, start + r1 * radius);
            let (b0, b1) = (end + r0 * radius, end + r1 * radius);

            self.push_vertex(a0, r0, color);
            self.push_vertex(a1, r1, color);
            self.push_vertex(b1, r1, color);
            self.push_vertex(a0, r0, color);
            self.push_vertex(b1, r1, color);
            self.push_vertex(b0, r0, color);

            self.push_vertex(start, -axis, color);
            self.push_vertex(a1, -axis, color);
            self.push_vertex(a0, -axis, color);

            self.push_vertex(end, axis, color);
            self.push_vertex(b0, axis, color);
            self.push_vertex(b1, axis, color);
        }
    }

    pub fn push_cone(&mut self, base: Vec3, tip: Vec3, radius: f32, color: [f32; 4]) {
        let height = (tip - base).length();
        let axis = (tip - base).normalize_or_zero();
        if axis == Vec3::ZERO {
            return;
        }
        let ring = ring_directions(axis);
        let slope = radius / height;

        for i in 0..SEGMENTS {
            let (r0, r1) = (ring[i], ring[(i + 1) % SEGMENTS]);
            let (p0, p1) = (base + r0 * radius, base + r1 * radius);
            let n0 = (r0 + axis * slope).normalize();
            let n1 = (r1 + axis * slope).normalize();

            self.push_vertex(p0, n0, color);
            self.push_vertex(p1, n1, color);
            self.push_vertex(tip, (n0 + n1).normalize(), color);

            self.push_vertex(base, -axis, color);
            self.push_vertex(p1, -axis, color);
            self.push_vertex(p0, -axis, color);
        }
    }

    /// Thick arrow: 70% shaft, 30% head
    pub fn push_arrow(
        &mut self,
        start: Vec3,
        axis: Vec3,
        length: f32,
        shaft_radius: f32,
        head_radius: f32,
        color: [f32; 4],
    ) {
        let neck = start + axis * (length * 0.7);
        self.push_cylinder(start, neck, shaft_radius, color);
        self.push_cone(neck, start + axis * length, head_radius, color);
    }

    /// Line arrow with a four-spoke head
    pub fn push_line_arrow(
        &mut self,
        start: Vec3,
        axis: Vec3,
        length: f32,
        head_length: f32,
        head_width: f32,
        color: [f32; 4],
    ) {
        let tip = start + axis * length;
        self.push_line(start, tip, color);

        let u = axis.any_orthonormal_vector();
        let v = axis.cross(u);
        let back = tip - axis * head_length;
        for spoke in [u, -u, v, -v] {
            self.push_line(tip, back + spoke * (head_width * 0.5), color);
        }
    }
}

fn ring_directions(axis: Vec3) -> [Vec3; SEGMENTS] {
    let u = axis.any_orthonormal_vector();
    let v = axis.cross(u);
    std::array::from_fn(|i| {
        let angle = i as f32 * TAU / SEGMENTS as f32;
        u * angle.cos() + v * angle.sin()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::QuestionGenerator;
    use proptest::prelude::*;

    fn scenario(field: FieldDirection, current: CurrentDirection, hidden: FactorKind) -> Scenario {
        Scenario::new(field, current, hidden)
    }

    fn arrow_kinds(layout: &SceneLayout) -> Vec<FactorKind> {
        layout.arrows.iter().map(|a| a.kind).collect()
    }

    #[test]
    fn field_to_the_right_puts_north_on_the_left() {
        let layout = apparatus_layout(&scenario(
            FieldDirection::Right,
            CurrentDirection::Out,
            FactorKind::Force,
        ));

        assert_eq!(layout.magnets[0].center.x, -MAGNET_OFFSET);
        assert_eq!(layout.magnets[0].pole, Some(Pole::North));
        assert_eq!(layout.magnets[1].pole, Some(Pole::South));
    }

    #[test]
    fn hidden_field_greys_out_the_magnets() {
        let layout = apparatus_layout(&scenario(
            FieldDirection::Left,
            CurrentDirection::In,
            FactorKind::Field,
        ));

        assert!(layout.magnets.iter().all(|m| m.pole.is_none()));
        assert!(layout.magnets.iter().all(|m| m.color() == palette::UNKNOWN));
        assert_eq!(arrow_kinds(&layout), vec![FactorKind::Force, FactorKind::Current]);
        assert_eq!(layout.marker.position, Vec3::ZERO);

        let geometry = layout.tessellate();
        let pole_labels: Vec<&str> = geometry
            .labels
            .iter()
            .filter(|l| l.style == LabelStyle::Pole)
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(pole_labels, vec!["?", "?"]);
    }

    #[test]
    fn hidden_force_draws_a_marker_above_the_wire() {
        let layout = apparatus_layout(&scenario(
            FieldDirection::Right,
            CurrentDirection::Out,
            FactorKind::Force,
        ));

        assert_eq!(
            arrow_kinds(&layout),
            vec![FactorKind::Current, FactorKind::Field, FactorKind::Field]
        );
        assert_eq!(layout.marker.position, Vec3::new(0.0, 1.5, 0.0));

        let geometry = layout.tessellate();
        assert!(geometry.labels.iter().all(|l| l.text != "Force"));
        assert!(geometry.labels.iter().any(|l| l.text == "Current (Out)"));
    }

    #[test]
    fn current_arrow_is_centred_on_the_wire() {
        let layout = apparatus_layout(&scenario(
            FieldDirection::Right,
            CurrentDirection::In,
            FactorKind::Force,
        ));
        let current = &layout.arrows[0];

        assert_eq!(current.direction, Direction::In);
        assert_eq!(current.start, Vec3::new(0.0, 0.3, 1.0));
        assert_eq!(current.tip(), Vec3::new(0.0, 0.3, -1.0));
        assert_eq!(current.label.as_deref(), Some("Current (In)"));
    }

    #[test]
    fn field_lines_run_between_the_magnets() {
        let layout = apparatus_layout(&scenario(
            FieldDirection::Left,
            CurrentDirection::Out,
            FactorKind::Current,
        ));

        for arrow in layout.arrows.iter().filter(|a| a.kind == FactorKind::Field) {
            assert_eq!(arrow.direction, Direction::Left);
            assert_eq!(arrow.start.x, 1.5);
            assert_eq!(arrow.tip().x, -1.5);
            assert_eq!(arrow.style, ArrowStyle::Line);
        }
        assert_eq!(layout.marker.position, Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn tessellation_produces_whole_primitives() {
        let layout = apparatus_layout(&scenario(
            FieldDirection::Right,
            CurrentDirection::Out,
            FactorKind::Current,
        ));
        let geometry = layout.tessellate();

        assert!(!geometry.triangles.is_empty());
        assert_eq!(geometry.triangles.len() % 3, 0);
        // Two field lines, five segments each
        assert_eq!(geometry.lines.len(), 2 * 5 * 2);
        assert!(geometry
            .triangles
            .iter()
            .all(|v| v.position.iter().chain(&v.normal).all(|c| c.is_finite())));
        assert_eq!(
            geometry
                .labels
                .iter()
                .filter(|l| l.style == LabelStyle::Marker)
                .count(),
            1
        );
    }

    #[test]
    fn box_faces_point_outwards() {
        let mut geometry = SceneGeometry::default();
        geometry.push_box(Vec3::ZERO, Vec3::new(0.5, 0.75, 0.75), palette::WIRE);

        assert_eq!(geometry.triangles.len(), 36);
        for vertex in &geometry.triangles {
            let position = Vec3::from_array(vertex.position);
            let normal = Vec3::from_array(vertex.normal);
            assert!(position.dot(normal) > 0.0);
            assert!(position.x.abs() <= 0.5 + 1e-6);
            assert!(position.y.abs() <= 0.75 + 1e-6);
        }
    }

    #[test]
    fn hand_fingers_obey_the_rule() {
        for finger in Finger::ALL {
            assert_eq!(Finger::for_factor(finger.factor()), finger);
        }
        let force = Finger::Thumb.pointing().axis();
        let field = Finger::First.pointing().axis();
        let current = Finger::Second.pointing().axis();
        assert_eq!(current.cross(field), force);
    }

    #[test]
    fn hand_highlights_the_hidden_factor() {
        let geometry = hand_reference(Some(FactorKind::Force));
        let thumb = geometry
            .labels
            .iter()
            .find(|l| l.text.starts_with("Thumb"))
            .unwrap();
        assert_eq!(thumb.color, palette::THUMB_HIGHLIGHT);
        assert_eq!(thumb.text, "Thumb: Force/Motion");

        let plain = hand_reference(None);
        assert!(plain
            .labels
            .iter()
            .all(|l| l.color != palette::THUMB_HIGHLIGHT));
        assert_eq!(plain.labels.len(), 3);
    }

    proptest! {
        #[test]
        fn arrows_show_only_the_given_factors(seed in any::<u64>()) {
            let question = QuestionGenerator::seeded(seed).next_question();
            let scenario = question.scenario();
            let layout = apparatus_layout(scenario);

            prop_assert_eq!(layout.marker.kind, scenario.hidden());
            for arrow in &layout.arrows {
                prop_assert_ne!(arrow.kind, scenario.hidden());
                prop_assert_eq!(arrow.direction, scenario.direction_of(arrow.kind));
            }
            for clue in question.given() {
                prop_assert!(layout.arrows.iter().any(|a| a.kind == clue.kind));
            }
        }
    }
}
