use cmtcore::math::FocalMechanism;
use std::f64::consts::SQRT_2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    Compressional,
    Dilatational,
    Outline,
}

/// Pixel offset from the glyph center (y grows downward) and its fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub dx: i32,
    pub dy: i32,
    pub fill: Fill,
}

/// Unit direction in (r, θ, φ) for a point of the lower-hemisphere
/// equal-area projection, given east/north offsets inside the unit disk.
pub fn projection_direction(east: f64, north: f64) -> Option<[f64; 3]> {
    let rho = (east * east + north * north).sqrt();
    if rho > 1.0 {
        return None;
    }
    let incidence = 2.0 * (rho / SQRT_2).asin();
    let (horizontal, down) = (incidence.sin(), incidence.cos());
    let (n, e) = if rho > 0.0 {
        (horizontal * north / rho, horizontal * east / rho)
    } else {
        (0.0, 0.0)
    };
    Some([-down, -n, e])
}

/// Rasterizes a beachball of `radius` pixels.
pub fn rasterize(mechanism: &FocalMechanism, radius: i32) -> Vec<Cell> {
    let radius = radius.max(1);
    let outer = f64::from(radius);
    let inner = (outer - 1.0).max(0.0);
    let mut cells = Vec::with_capacity((4 * radius * radius) as usize);

    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let distance = f64::from(dx * dx + dy * dy).sqrt();
            if distance > outer {
                continue;
            }
            let fill = if radius > 2 && distance > inner {
                Fill::Outline
            } else {
                let east = f64::from(dx) / outer;
                let north = -f64::from(dy) / outer;
                match projection_direction(east, north) {
                    Some(direction) if mechanism.is_compressional(direction) => {
                        Fill::Compressional
                    }
                    _ => Fill::Dilatational,
                }
            };
            cells.push(Cell { dx, dy, fill });
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmtcore::math::FaultStyle;

    fn mechanism(style: FaultStyle) -> FocalMechanism {
        FocalMechanism::from_tensor(&style.reference_tensor()).unwrap()
    }

    fn fill_at(cells: &[Cell], dx: i32, dy: i32) -> Fill {
        cells
            .iter()
            .find(|cell| cell.dx == dx && cell.dy == dy)
            .map(|cell| cell.fill)
            .unwrap()
    }

    #[test]
    fn center_points_straight_down() {
        let direction = projection_direction(0.0, 0.0).unwrap();
        assert_eq!(direction, [-1.0, 0.0, 0.0]);
        let rim = projection_direction(1.0, 0.0).unwrap();
        assert!(rim[0].abs() < 1e-12);
        assert!((rim[2] - 1.0).abs() < 1e-12);
        assert!(projection_direction(1.0, 1.0).is_none());
    }

    #[test]
    fn thrust_glyph_has_compressional_center() {
        let cells = rasterize(&mechanism(FaultStyle::Thrust), 20);
        assert_eq!(fill_at(&cells, 0, 0), Fill::Compressional);
        assert_eq!(fill_at(&cells, 15, 0), Fill::Dilatational);
        assert_eq!(fill_at(&cells, 20, 0), Fill::Outline);
    }

    #[test]
    fn normal_glyph_has_dilatational_center() {
        let cells = rasterize(&mechanism(FaultStyle::Normal), 20);
        assert_eq!(fill_at(&cells, 0, 0), Fill::Dilatational);
        assert_eq!(fill_at(&cells, 15, 0), Fill::Compressional);
    }

    #[test]
    fn strike_slip_glyph_has_four_quadrants() {
        let cells = rasterize(&mechanism(FaultStyle::StrikeSlip), 20);
        assert_eq!(fill_at(&cells, 12, 0), Fill::Compressional);
        assert_eq!(fill_at(&cells, -12, 0), Fill::Compressional);
        assert_eq!(fill_at(&cells, 0, 12), Fill::Dilatational);
        assert_eq!(fill_at(&cells, 0, -12), Fill::Dilatational);
    }

    #[test]
    fn cells_stay_inside_the_disk() {
        let cells = rasterize(&mechanism(FaultStyle::Thrust), 6);
        assert!(cells.iter().all(|c| c.dx * c.dx + c.dy * c.dy <= 36));
        assert!(!rasterize(&mechanism(FaultStyle::Thrust), 0).is_empty());
    }
}
