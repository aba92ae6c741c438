//! Bresenham line rasterization.

use crate::display::PixelCoord;

/// The pixels of the straight line between two points, both ends included.
///
/// The line is walked one pixel at a time along its major axis (x when the line is shallower than
/// 45 degrees, y otherwise), stepping the minor axis whenever the midpoint decision term turns
/// positive. Endpoints are put in ascending major-axis order first, so a line and its reverse
/// cover exactly the same pixels.
#[derive(Clone, Debug)]
pub struct Line {
    major: i16,
    minor: i16,
    major_end: i16,
    minor_step: i16,
    major_delta: i16,
    minor_delta: i16,
    decision: i16,
    steep: bool,
    done: bool,
}

impl Line {
    pub fn new(from: PixelCoord, to: PixelCoord) -> Self {
        let steep = (to.1 - from.1).abs() >= (to.0 - from.0).abs();
        let (a, b) = if steep {
            ((from.1, from.0), (to.1, to.0))
        } else {
            ((from.0, from.1), (to.0, to.1))
        };
        let (a, b) = if a.0 <= b.0 { (a, b) } else { (b, a) };
        let major_delta = b.0 - a.0;
        let (minor_delta, minor_step) = if b.1 < a.1 {
            (a.1 - b.1, -1)
        } else {
            (b.1 - a.1, 1)
        };
        Line {
            major: a.0,
            minor: a.1,
            major_end: b.0,
            minor_step,
            major_delta,
            minor_delta,
            decision: 2 * minor_delta - major_delta,
            steep,
            done: false,
        }
    }
}

impl Iterator for Line {
    type Item = PixelCoord;

    fn next(&mut self) -> Option<PixelCoord> {
        if self.done {
            return None;
        }
        let pixel = if self.steep {
            PixelCoord(self.minor, self.major)
        } else {
            PixelCoord(self.major, self.minor)
        };
        if self.major == self.major_end {
            self.done = true;
        } else {
            if self.decision > 0 {
                self.minor += self.minor_step;
                self.decision -= 2 * self.major_delta;
            }
            self.decision += 2 * self.minor_delta;
            self.major += 1;
        }
        Some(pixel)
    }
}
