use crate::palette::Color;

// =============================================================================
// Scene Graph
// =============================================================================

/// Retained drawing of one chart in pixel space.
///
/// Commands are grouped into named layers so a controller can replace one
/// layer (e.g. pie slices) without touching the others.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: &'static str,
    pub commands: Vec<DrawCommand>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectGeom {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Pie wedge; angles in radians, clockwise from 12 o'clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGeom {
    pub center: (f64, f64),
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl ArcGeom {
    pub fn centroid(&self) -> (f64, f64) {
        let mid = (self.start_angle + self.end_angle) / 2.0;
        let r = self.radius / 2.0;
        (self.center.0 + r * mid.sin(), self.center.1 - r * mid.cos())
    }

    /// Whether a pixel lies inside the wedge.
    pub fn contains(&self, point: (f64, f64)) -> bool {
        let dx = point.0 - self.center.0;
        let dy = point.1 - self.center.1;
        if dx.hypot(dy) > self.radius {
            return false;
        }
        let mut angle = dx.atan2(-dy);
        if angle < 0.0 {
            angle += std::f64::consts::TAU;
        }
        angle >= self.start_angle && angle < self.end_angle
    }

    /// Polygon approximation, closed through the center.
    pub fn outline(&self) -> Vec<(f64, f64)> {
        let sweep = self.end_angle - self.start_angle;
        let segments = ((sweep / std::f64::consts::TAU) * 96.0).ceil().max(1.0) as usize;
        let mut points = Vec::with_capacity(segments + 2);
        points.push(self.center);
        for i in 0..=segments {
            let a = self.start_angle + sweep * i as f64 / segments as f64;
            points.push((
                self.center.0 + self.radius * a.sin(),
                self.center.1 - self.radius * a.cos(),
            ));
        }
        points
    }
}

/// Enter animation: geometry starts at `from` and eases to its final value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enter<T> {
    pub from: T,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub bold: bool,
    pub anchor: Anchor,
    /// Rotated a quarter turn counter-clockwise.
    pub vertical: bool,
}

impl TextStyle {
    pub fn plain(size: f64) -> Self {
        TextStyle {
            size,
            bold: false,
            anchor: Anchor::Start,
            vertical: false,
        }
    }

    pub fn centered(size: f64) -> Self {
        TextStyle {
            anchor: Anchor::Middle,
            ..TextStyle::plain(size)
        }
    }

    pub fn title(size: f64) -> Self {
        TextStyle {
            bold: true,
            ..TextStyle::centered(size)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        geom: RectGeom,
        fill: Color,
        enter: Option<Enter<RectGeom>>,
        tag: Option<String>,
    },
    Wedge {
        geom: ArcGeom,
        fill: Color,
        stroke: Option<(Color, f64)>,
        enter: Option<Enter<ArcGeom>>,
        tag: Option<String>,
    },
    Polyline {
        points: Vec<(f64, f64)>,
        stroke: Color,
        width: f64,
        tag: Option<String>,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        stroke: Color,
        width: f64,
    },
    Text {
        pos: (f64, f64),
        text: String,
        style: TextStyle,
    },
}

impl DrawCommand {
    pub fn tag(&self) -> Option<&str> {
        match self {
            DrawCommand::Rect { tag, .. }
            | DrawCommand::Wedge { tag, .. }
            | DrawCommand::Polyline { tag, .. } => tag.as_deref(),
            DrawCommand::Line { .. } | DrawCommand::Text { .. } => None,
        }
    }

    /// The command as it appears `elapsed_ms` after it was drawn.
    pub fn at(&self, elapsed_ms: u64) -> DrawCommand {
        match self {
            DrawCommand::Rect {
                geom,
                fill,
                enter: Some(enter),
                tag,
            } => {
                let t = progress(elapsed_ms, enter.duration_ms);
                DrawCommand::Rect {
                    geom: RectGeom {
                        x: lerp(enter.from.x, geom.x, t),
                        y: lerp(enter.from.y, geom.y, t),
                        width: lerp(enter.from.width, geom.width, t),
                        height: lerp(enter.from.height, geom.height, t),
                    },
                    fill: *fill,
                    enter: if t < 1.0 { Some(*enter) } else { None },
                    tag: tag.clone(),
                }
            }
            DrawCommand::Wedge {
                geom,
                fill,
                stroke,
                enter: Some(enter),
                tag,
            } => {
                let t = progress(elapsed_ms, enter.duration_ms);
                DrawCommand::Wedge {
                    geom: ArcGeom {
                        center: geom.center,
                        radius: geom.radius,
                        start_angle: lerp(enter.from.start_angle, geom.start_angle, t),
                        end_angle: lerp(enter.from.end_angle, geom.end_angle, t),
                    },
                    fill: *fill,
                    stroke: *stroke,
                    enter: if t < 1.0 { Some(*enter) } else { None },
                    tag: tag.clone(),
                }
            }
            other => other.clone(),
        }
    }
}

impl Scene {
    pub fn new(width: u32, height: u32) -> Self {
        Scene {
            width,
            height,
            groups: Vec::new(),
        }
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Replace a group's commands in place, appending the group if absent.
    pub fn replace_group(&mut self, id: &'static str, commands: Vec<DrawCommand>) {
        match self.groups.iter_mut().find(|g| g.id == id) {
            Some(group) => group.commands = commands,
            None => self.groups.push(Group { id, commands }),
        }
    }

    pub fn commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.groups.iter().flat_map(|g| g.commands.iter())
    }

    /// Snapshot of every enter transition `elapsed_ms` into the animation.
    pub fn frame_at(&self, elapsed_ms: u64) -> Scene {
        Scene {
            width: self.width,
            height: self.height,
            groups: self
                .groups
                .iter()
                .map(|g| Group {
                    id: g.id,
                    commands: g.commands.iter().map(|c| c.at(elapsed_ms)).collect(),
                })
                .collect(),
        }
    }

    /// The settled scene once all transitions have finished.
    pub fn settled(&self) -> Scene {
        self.frame_at(u64::MAX)
    }
}

fn progress(elapsed_ms: u64, duration_ms: u64) -> f64 {
    if duration_ms == 0 || elapsed_ms >= duration_ms {
        return 1.0;
    }
    ease_cubic_in_out(elapsed_ms as f64 / duration_ms as f64)
}

fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
