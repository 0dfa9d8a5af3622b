use delve_core::{Point, Range};

/// Search state for one rectangular area.
///
/// Wave marks, component labels and the neighbour buffer live here and are
/// reused between queries, so a level keeps one `PathRange` for its whole
/// lifetime.
pub struct PathRange {
    pub(crate) area: Range,
    pub(crate) width: usize,
    pub(crate) wave_marks: Vec<u32>,
    pub(crate) wave_generation: u32,
    pub(crate) cc_labels: Vec<i32>,
    pub(crate) cc_stack: Vec<usize>,
    pub(crate) nbuf: Vec<Point>,
}

impl PathRange {
    pub fn new(area: Range) -> Self {
        let len = area.len();
        Self {
            area,
            width: area.width().max(0) as usize,
            wave_marks: vec![0; len],
            wave_generation: 0,
            cc_labels: vec![-1; len],
            cc_stack: Vec::new(),
            nbuf: Vec::with_capacity(8),
        }
    }

    /// Move the searches to another area. Buffers only grow: a smaller area
    /// keeps them and starts a new wave generation.
    pub fn set_range(&mut self, area: Range) {
        let len = area.len();
        self.area = area;
        self.width = area.width().max(0) as usize;
        if len <= self.wave_marks.len() {
            self.wave_generation = self.wave_generation.wrapping_add(1);
            return;
        }
        self.wave_marks = vec![0; len];
        self.wave_generation = 0;
        self.cc_labels = vec![-1; len];
        self.cc_stack.clear();
    }

    pub fn range(&self) -> Range {
        self.area
    }

    /// Flat buffer index of `p`, if it lies in the area.
    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        if !self.area.contains(p) {
            return None;
        }
        let rel = p - self.area.min;
        Some(rel.y as usize * self.width + rel.x as usize)
    }

    #[inline]
    pub(crate) fn point(&self, idx: usize) -> Point {
        let rel = Point::new((idx % self.width) as i32, (idx / self.width) as i32);
        self.area.min + rel
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PathRange {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.area.serialize(serializer)
    }
}

/// Only the area is stored; buffers start fresh.
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PathRange {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Range::deserialize(deserializer).map(PathRange::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrinking_keeps_buffers() {
        let mut pr = PathRange::new(Range::new(0, 0, 20, 20));
        let small = Range::new(0, 0, 5, 5);
        pr.set_range(small);
        assert_eq!(pr.range(), small);
        assert_eq!(pr.wave_marks.len(), 400);
        assert_eq!(pr.width, 5);
        assert_eq!(pr.wave_generation, 1);
    }

    #[test]
    fn growing_reallocates() {
        let mut pr = PathRange::new(Range::new(0, 0, 5, 5));
        pr.set_range(Range::new(0, 0, 20, 20));
        assert_eq!(pr.wave_marks.len(), 400);
        assert_eq!(pr.cc_labels.len(), 400);
        assert_eq!(pr.wave_generation, 0);
    }

    #[test]
    fn offset_area_indexing() {
        let pr = PathRange::new(Range::new(2, 3, 7, 9));
        let p = Point::new(4, 8);
        let i = pr.idx(p).unwrap();
        assert_eq!(i, 5 * 5 + 2);
        assert_eq!(pr.point(i), p);
        assert_eq!(pr.idx(Point::new(7, 3)), None);
        assert_eq!(pr.idx(Point::new(1, 3)), None);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn only_the_area_is_stored() {
        let area = Range::new(1, 2, 10, 20);
        let json = serde_json::to_string(&PathRange::new(area)).unwrap();
        let back: PathRange = serde_json::from_str(&json).unwrap();
        assert_eq!(back.range(), area);
        assert_eq!(back.wave_generation, 0);
        assert_eq!(back.wave_marks.len(), area.len());
    }
}
