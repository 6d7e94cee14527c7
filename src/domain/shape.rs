//! Annotation shape types for drawing on screenshots
//!
//! All coordinates are in global logical coordinates. Every type here is a
//! plain value: cloning copies every field and nothing is shared.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::{PointF, RectF};

/// Errors produced when parsing shape labels or colors from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeParseError {
    #[error("unknown shape type: {0:?}")]
    UnknownKind(String),
    #[error("invalid color: {0:?}")]
    InvalidColor(String),
}

/// Kind of annotation a shape represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Oval,
    Arrow,
    Line,
    Text,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Rectangle,
        ShapeKind::Oval,
        ShapeKind::Arrow,
        ShapeKind::Line,
        ShapeKind::Text,
    ];

    /// Label used in streams and debug output
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Oval => "oval",
            ShapeKind::Arrow => "arrow",
            ShapeKind::Line => "line",
            ShapeKind::Text => "text",
        }
    }
}

impl FromStr for ShapeKind {
    type Err = ShapeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ShapeParseError::UnknownKind(s.to_string()))
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stroke color of an annotation (8 bits per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PenColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for PenColor {
    fn default() -> Self {
        Self::rgb(0, 0, 0)
    }
}

impl PenColor {
    /// Opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl FromStr for PenColor {
    type Err = ShapeParseError;

    /// Parse `#rrggbb` or `#rrggbbaa`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ShapeParseError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl fmt::Display for PenColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for PenColor {
    type Error = ShapeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PenColor> for String {
    fn from(color: PenColor) -> Self {
        color.to_string()
    }
}

fn fmt_points(f: &mut fmt::Formatter<'_>, points: &[PointF]) -> fmt::Result {
    f.write_str("[")?;
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{p}")?;
    }
    f.write_str("]")
}

fn kind_label(kind: Option<ShapeKind>) -> &'static str {
    kind.map(ShapeKind::as_str).unwrap_or("")
}

/// Endpoints of a diagonal or line annotation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagPoints {
    /// Point where the drag started
    pub master_point: PointF,
    /// Point where the drag currently is
    pub deputy_point: PointF,
}

impl DiagPoints {
    pub fn new(master_point: PointF, deputy_point: PointF) -> Self {
        Self {
            master_point,
            deputy_point,
        }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> DiagPoints {
        DiagPoints {
            master_point: self.master_point.translate(dx, dy),
            deputy_point: self.deputy_point.translate(dx, dy),
        }
    }
}

impl fmt::Display for DiagPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DiagPoints:[{},{}]", self.master_point, self.deputy_point)
    }
}

pub type DiagPointsList = Vec<DiagPoints>;

/// Corners of a quadrilateral annotation plus an auxiliary point sequence
///
/// No ordering is enforced among `point1..point4`; shapes built with
/// [`FourPoints::from_diagonal`] use top-left, bottom-left, top-right,
/// bottom-right.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FourPoints {
    pub point1: PointF,
    pub point2: PointF,
    pub point3: PointF,
    pub point4: PointF,
    #[serde(default)]
    pub shape_type: Option<ShapeKind>,
    #[serde(default)]
    pub points: Vec<PointF>,
}

impl FourPoints {
    /// Axis-aligned corners spanned by a drag diagonal
    pub fn from_diagonal(diag: DiagPoints, kind: ShapeKind) -> Self {
        let rect = RectF::from_corners(diag.master_point, diag.deputy_point);
        Self {
            point1: PointF::new(rect.left, rect.top),
            point2: PointF::new(rect.left, rect.bottom),
            point3: PointF::new(rect.right, rect.top),
            point4: PointF::new(rect.right, rect.bottom),
            shape_type: Some(kind),
            points: Vec::new(),
        }
    }

    pub fn corners(&self) -> [PointF; 4] {
        [self.point1, self.point2, self.point3, self.point4]
    }

    /// Bounds of the four corners
    pub fn bounding_rect(&self) -> RectF {
        let corners = self.corners();
        RectF::bounding(&corners).unwrap_or_default()
    }

    /// Move corners and auxiliary points by the given offset
    pub fn translate(&mut self, dx: f64, dy: f64) {
        for p in [
            &mut self.point1,
            &mut self.point2,
            &mut self.point3,
            &mut self.point4,
        ] {
            *p = p.translate(dx, dy);
        }
        for p in &mut self.points {
            *p = p.translate(dx, dy);
        }
    }
}

impl fmt::Display for FourPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FourPoints:[{},{},{},{}] shapeType:{} points:",
            self.point1,
            self.point2,
            self.point3,
            self.point4,
            kind_label(self.shape_type)
        )?;
        fmt_points(f, &self.points)
    }
}

pub type MPointsList = Vec<FourPoints>;

/// Full description of one user-drawn annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Toolshape {
    pub kind: Option<ShapeKind>,
    pub main_points: FourPoints,
    /// Stroke width in logical pixels
    pub line_width: i32,
    pub pen_color: PenColor,
    pub is_blur: bool,
    pub is_mosaic: bool,
    pub font_size: i32,
    /// Free-hand or line vertices
    pub points: Vec<PointF>,
}

impl Default for Toolshape {
    fn default() -> Self {
        Self {
            kind: None,
            main_points: FourPoints::default(),
            line_width: 0,
            pen_color: PenColor::default(),
            is_blur: false,
            is_mosaic: false,
            font_size: 1,
            points: Vec::new(),
        }
    }
}

impl Toolshape {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Whether this shape hides the content below it instead of outlining it
    pub fn is_obscuring(&self) -> bool {
        self.is_blur || self.is_mosaic
    }

    /// Every coordinate the shape owns is finite
    pub fn is_finite(&self) -> bool {
        self.main_points
            .corners()
            .iter()
            .chain(&self.main_points.points)
            .chain(&self.points)
            .all(PointF::is_finite)
    }

    /// Move the whole shape, used while the user drags it
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.main_points.translate(dx, dy);
        for p in &mut self.points {
            *p = p.translate(dx, dy);
        }
    }

    /// Bounds of every coordinate the shape owns
    pub fn bounding_rect(&self) -> RectF {
        let corners = self.main_points.corners();
        RectF::bounding(
            corners
                .iter()
                .chain(&self.main_points.points)
                .chain(&self.points),
        )
        .unwrap_or_default()
    }
}

impl fmt::Display for Toolshape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Toolshape:[type:{}, mainPoints:{}, lineWidth:{}, penColor:{}, isBlur:{}, isMosaic:{}, fontSize:{}, points:",
            kind_label(self.kind),
            self.main_points,
            self.line_width,
            self.pen_color,
            self.is_blur,
            self.is_mosaic,
            self.font_size
        )?;
        fmt_points(f, &self.points)?;
        f.write_str("]")
    }
}

pub type Toolshapes = Vec<Toolshape>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_kind_labels() {
        for kind in ShapeKind::ALL {
            assert_eq!(kind.as_str().parse::<ShapeKind>().unwrap(), kind);
        }
        assert_eq!(
            "hexagon".parse::<ShapeKind>(),
            Err(ShapeParseError::UnknownKind("hexagon".to_string()))
        );
    }

    #[test]
    fn test_pen_color_parse() {
        assert_eq!("#ff8000".parse::<PenColor>().unwrap(), PenColor::rgb(255, 128, 0));
        assert_eq!(
            "#10203040".parse::<PenColor>().unwrap(),
            PenColor::rgba(0x10, 0x20, 0x30, 0x40)
        );
        assert!("ff8000".parse::<PenColor>().is_err());
        assert!("#ff80".parse::<PenColor>().is_err());
        assert!("#gg0000".parse::<PenColor>().is_err());
        // from_str_radix alone would take a sign
        assert!("#+f+f+f".parse::<PenColor>().is_err());
        assert!("#+f+f+f+f".parse::<PenColor>().is_err());
    }

    #[test]
    fn test_pen_color_display() {
        assert_eq!(PenColor::rgb(255, 0, 16).to_string(), "#ff0010");
        assert_eq!(PenColor::rgba(1, 2, 3, 4).to_string(), "#01020304");
    }

    #[test]
    fn test_defaults() {
        let shape = Toolshape::default();
        assert_eq!(shape.kind, None);
        assert_eq!(shape.font_size, 1);
        assert!(!shape.is_blur);
        assert!(!shape.is_mosaic);
        assert!(shape.points.is_empty());
        assert_eq!(shape.main_points, FourPoints::default());
        assert_eq!(DiagPoints::default().master_point, PointF::default());
    }

    #[test]
    fn test_from_diagonal_orders_corners() {
        let diag = DiagPoints::new(PointF::new(50.0, 10.0), PointF::new(20.0, 40.0));
        let fp = FourPoints::from_diagonal(diag, ShapeKind::Rectangle);
        assert_eq!(fp.point1, PointF::new(20.0, 10.0));
        assert_eq!(fp.point2, PointF::new(20.0, 40.0));
        assert_eq!(fp.point3, PointF::new(50.0, 10.0));
        assert_eq!(fp.point4, PointF::new(50.0, 40.0));
        assert_eq!(fp.shape_type, Some(ShapeKind::Rectangle));
    }

    #[test]
    fn test_toolshape_translate_moves_everything() {
        let diag = DiagPoints::new(PointF::new(0.0, 0.0), PointF::new(10.0, 10.0));
        let mut shape = Toolshape::new(ShapeKind::Oval);
        shape.main_points = FourPoints::from_diagonal(diag, ShapeKind::Oval);
        shape.main_points.points.push(PointF::new(5.0, 5.0));
        shape.points.push(PointF::new(1.0, 2.0));

        shape.translate(3.0, -2.0);

        assert_eq!(shape.main_points.point1, PointF::new(3.0, -2.0));
        assert_eq!(shape.main_points.point4, PointF::new(13.0, 8.0));
        assert_eq!(shape.main_points.points[0], PointF::new(8.0, 3.0));
        assert_eq!(shape.points[0], PointF::new(4.0, 0.0));
    }

    #[test]
    fn test_toolshape_bounding_rect_includes_free_points() {
        let diag = DiagPoints::new(PointF::new(0.0, 0.0), PointF::new(10.0, 10.0));
        let mut shape = Toolshape::new(ShapeKind::Line);
        shape.main_points = FourPoints::from_diagonal(diag, ShapeKind::Line);
        shape.points.push(PointF::new(-5.0, 20.0));
        let rect = shape.bounding_rect();
        assert_eq!(rect.left, -5.0);
        assert_eq!(rect.bottom, 20.0);
        assert_eq!(rect.right, 10.0);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = Toolshape::new(ShapeKind::Arrow);
        original.points.push(PointF::new(1.0, 1.0));
        let mut copy = original.clone();
        copy.points.push(PointF::new(2.0, 2.0));
        copy.line_width = 8;
        assert_eq!(original.points.len(), 1);
        assert_eq!(original.line_width, 0);
    }

    #[test]
    fn test_toolshape_is_finite() {
        let mut shape = Toolshape::new(ShapeKind::Line);
        shape.points.push(PointF::new(1.0, 1.0));
        assert!(shape.is_finite());
        shape.main_points.points.push(PointF::new(f64::INFINITY, 0.0));
        assert!(!shape.is_finite());

        let mut corner = Toolshape::new(ShapeKind::Rectangle);
        corner.main_points.point3 = PointF::new(0.0, f64::NAN);
        assert!(!corner.is_finite());
    }

    #[test]
    fn test_is_obscuring() {
        let mut shape = Toolshape::new(ShapeKind::Rectangle);
        assert!(!shape.is_obscuring());
        shape.is_mosaic = true;
        assert!(shape.is_obscuring());
    }

    #[test]
    fn test_debug_forms() {
        let diag = DiagPoints::new(PointF::new(1.0, 2.0), PointF::new(3.0, 4.0));
        assert_eq!(diag.to_string(), "DiagPoints:[(1, 2),(3, 4)]");

        let mut fp = FourPoints::from_diagonal(diag, ShapeKind::Rectangle);
        fp.points.push(PointF::new(2.0, 2.0));
        assert_eq!(
            fp.to_string(),
            "FourPoints:[(1, 2),(1, 4),(3, 2),(3, 4)] shapeType:rectangle points:[(2, 2)]"
        );

        let shape = Toolshape::default();
        assert_eq!(
            shape.to_string(),
            "Toolshape:[type:, mainPoints:FourPoints:[(0, 0),(0, 0),(0, 0),(0, 0)] shapeType: points:[], \
             lineWidth:0, penColor:#000000, isBlur:false, isMosaic:false, fontSize:1, points:[]]"
        );
    }

    #[test]
    fn test_serde_uses_labels_and_hex() {
        let mut shape = Toolshape::new(ShapeKind::Text);
        shape.pen_color = PenColor::rgb(255, 0, 0);
        let json = serde_json::to_value(&shape).unwrap();
        assert_eq!(json["kind"], "text");
        assert_eq!(json["pen_color"], "#ff0000");

        let back: Toolshape = serde_json::from_value(json).unwrap();
        assert_eq!(back, shape);

        let partial: Toolshape = serde_json::from_str(r#"{"kind":"oval"}"#).unwrap();
        assert_eq!(partial.font_size, 1);
        assert!(serde_json::from_str::<Toolshape>(r#"{"pen_color":"red"}"#).is_err());
    }
}
