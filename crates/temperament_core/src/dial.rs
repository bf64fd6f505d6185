//! Sub-temperament clock-face indicator.

use crate::draw::Graphic;
use crate::types::SubTemperament;

/// Needle angle in degrees per sub-temperament, in declaration order.
/// 0° points up and angles grow clockwise.
pub const DIAL_ANGLES: [f64; 12] = [
    10.0, 45.0, 80.0, 100.0, 135.0, 170.0, 190.0, 225.0, 260.0, 290.0, 315.0, 350.0,
];

pub const CANVAS_SIZE: f32 = 200.0;
pub const NEEDLE_RADIUS: f64 = 80.0;
pub const STROKE_WIDTH: f32 = 2.0;

pub fn angle_for(sub: SubTemperament) -> f64 {
    DIAL_ANGLES[sub.ordinal()]
}

/// Needle tip on a canvas whose `y` axis points down, rounded to whole units.
pub fn needle_end(angle_degrees: f64, center: (f64, f64), radius: f64) -> (f64, f64) {
    let radians = (angle_degrees - 90.0).to_radians();
    (
        (center.0 + radians.cos() * radius).round(),
        (center.1 + radians.sin() * radius).round(),
    )
}

/// Vector description of the needle for one sub-temperament.
pub fn dial_graphic(sub: SubTemperament) -> Graphic {
    let center = f64::from(CANVAS_SIZE) / 2.0;
    let (x2, y2) = needle_end(angle_for(sub), (center, center), NEEDLE_RADIUS);
    Graphic::Line {
        canvas_width: CANVAS_SIZE,
        canvas_height: CANVAS_SIZE,
        x1: center as f32,
        y1: center as f32,
        x2: x2 as f32,
        y2: y2 as f32,
        stroke_width: STROKE_WIDTH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_points_up() {
        assert_eq!(needle_end(0.0, (100.0, 100.0), 80.0), (100.0, 20.0));
        assert_eq!(needle_end(90.0, (100.0, 100.0), 80.0), (180.0, 100.0));
        assert_eq!(needle_end(180.0, (100.0, 100.0), 80.0), (100.0, 180.0));
        assert_eq!(needle_end(270.0, (100.0, 100.0), 80.0), (20.0, 100.0));
    }

    #[test]
    fn test_angle_table_follows_declaration_order() {
        assert_eq!(angle_for(SubTemperament::Faisca), 10.0);
        assert_eq!(angle_for(SubTemperament::Pedra), 100.0);
        assert_eq!(angle_for(SubTemperament::Agua), 225.0);
        assert_eq!(angle_for(SubTemperament::Vento), 350.0);
    }

    #[test]
    fn test_dial_graphic_for_faisca() {
        // 10° from vertical: sin(10°)*80 = 13.9, cos(10°)*80 = 78.8
        let Graphic::Line { x1, y1, x2, y2, .. } = dial_graphic(SubTemperament::Faisca);
        assert_eq!((x1, y1), (100.0, 100.0));
        assert_eq!((x2, y2), (114.0, 21.0));
    }

    #[test]
    fn test_every_needle_has_fixed_length() {
        for sub in SubTemperament::DECLARATION_ORDER {
            let Graphic::Line { x1, y1, x2, y2, .. } = dial_graphic(sub);
            let len = ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();
            assert!((len - 80.0).abs() < 1.0, "{sub}: {len}");
        }
    }
}
