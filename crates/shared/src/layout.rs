use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Ось перегородки: X - стенка поперёк оси X (лежит вдоль Z), Z - наоборот
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DividerAxis {
    X,
    Z,
}

impl DividerAxis {
    /// Перпендикулярная ось
    pub fn cross(&self) -> DividerAxis {
        match self {
            DividerAxis::X => DividerAxis::Z,
            DividerAxis::Z => DividerAxis::X,
        }
    }
}

/// Участок перегородки `line` между соседними поперечными перегородками
/// (интервал номер `segment` вдоль перегородки)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentKey {
    pub axis: DividerAxis,
    pub line: usize,
    pub segment: usize,
}

impl SegmentKey {
    pub fn new(axis: DividerAxis, line: usize, segment: usize) -> Self {
        Self { axis, line, segment }
    }
}

/// Раскладка внутренних перегородок короба
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DividerLayout {
    /// Позиции перегородок по X (отсортированы)
    #[serde(default)]
    pub x: Vec<f64>,
    /// Позиции перегородок по Z (отсортированы)
    #[serde(default)]
    pub z: Vec<f64>,
    /// Скрытые участки (проходы между ячейками)
    #[serde(default)]
    pub hidden: BTreeSet<SegmentKey>,
}

impl DividerLayout {
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() && self.z.is_empty()
    }

    /// Позиции перегородок по оси
    pub fn lines(&self, axis: DividerAxis) -> &[f64] {
        match axis {
            DividerAxis::X => &self.x,
            DividerAxis::Z => &self.z,
        }
    }

    fn lines_mut(&mut self, axis: DividerAxis) -> &mut Vec<f64> {
        match axis {
            DividerAxis::X => &mut self.x,
            DividerAxis::Z => &mut self.z,
        }
    }

    /// Число участков у каждой перегородки оси
    pub fn segment_count(&self, axis: DividerAxis) -> usize {
        self.lines(axis.cross()).len() + 1
    }

    pub fn is_hidden(&self, key: &SegmentKey) -> bool {
        self.hidden.contains(key)
    }

    /// Границы ячеек вдоль оси: стенка полости, перегородки, стенка полости
    pub fn cell_edges(&self, axis: DividerAxis, half: f64) -> Vec<f64> {
        let mut edges = Vec::with_capacity(self.lines(axis).len() + 2);
        edges.push(-half);
        edges.extend(self.lines(axis).iter().map(|p| p.clamp(-half, half)));
        edges.push(half);
        edges
    }

    /// Добавить перегородку (позиция ограничивается ±limit), вернуть её индекс
    pub fn add(&mut self, axis: DividerAxis, pos: f64, limit: f64) -> usize {
        let pos = pos.clamp(-limit, limit);
        let lines = self.lines_mut(axis);
        let index = lines.partition_point(|&p| p < pos);
        lines.insert(index, pos);

        // Индексы скрытых участков сдвигаются; разрезанный участок остаётся скрытым с обеих сторон
        let cross = axis.cross();
        self.hidden = self
            .hidden
            .iter()
            .flat_map(|key| {
                let mut out = Vec::with_capacity(2);
                if key.axis == axis {
                    let line = if key.line >= index { key.line + 1 } else { key.line };
                    out.push(SegmentKey::new(axis, line, key.segment));
                } else if key.segment < index {
                    out.push(*key);
                } else if key.segment > index {
                    out.push(SegmentKey::new(cross, key.line, key.segment + 1));
                } else {
                    out.push(*key);
                    out.push(SegmentKey::new(cross, key.line, key.segment + 1));
                }
                out
            })
            .collect();

        index
    }

    /// Переместить перегородку; позиция зажимается между соседями, порядок не меняется
    pub fn move_to(&mut self, axis: DividerAxis, index: usize, pos: f64, limit: f64) -> Option<f64> {
        let lines = self.lines_mut(axis);
        if index >= lines.len() {
            return None;
        }
        let lo = if index > 0 { lines[index - 1] } else { -limit };
        let hi = if index + 1 < lines.len() { lines[index + 1] } else { limit };
        let clamped = pos.clamp(lo.min(hi), hi.max(lo));
        lines[index] = clamped;
        Some(clamped)
    }

    /// Удалить перегородку с перенумерацией скрытых участков
    pub fn remove(&mut self, axis: DividerAxis, index: usize) -> Option<f64> {
        if index >= self.lines(axis).len() {
            return None;
        }
        let removed = self.lines_mut(axis).remove(index);
        let cross = axis.cross();
        let old = std::mem::take(&mut self.hidden);

        for key in &old {
            if key.axis == axis {
                if key.line < index {
                    self.hidden.insert(*key);
                } else if key.line > index {
                    self.hidden.insert(SegmentKey::new(axis, key.line - 1, key.segment));
                }
            } else if key.segment < index {
                self.hidden.insert(*key);
            } else if key.segment > index + 1 {
                self.hidden.insert(SegmentKey::new(cross, key.line, key.segment - 1));
            }
        }

        // Слитый участок остаётся скрытым, только если были скрыты обе половины
        for line in 0..self.lines(cross).len() {
            let left = SegmentKey::new(cross, line, index);
            let right = SegmentKey::new(cross, line, index + 1);
            if old.contains(&left) && old.contains(&right) {
                self.hidden.insert(left);
            }
        }

        Some(removed)
    }

    /// Скрыть участок и удалить полностью скрытые перегородки.
    /// Возвращает false, если участок не существует.
    pub fn hide_segment(&mut self, key: SegmentKey) -> bool {
        if key.line >= self.lines(key.axis).len() || key.segment >= self.segment_count(key.axis) {
            return false;
        }
        self.hidden.insert(key);
        self.cleanup();
        true
    }

    /// Удалить все перегородки, у которых скрыты все участки; вернуть число удалённых
    pub fn cleanup(&mut self) -> usize {
        let mut removed = 0;
        'outer: loop {
            for axis in [DividerAxis::X, DividerAxis::Z] {
                let segments = self.segment_count(axis);
                let fully_hidden = (0..self.lines(axis).len()).find(|&line| {
                    (0..segments).all(|segment| self.is_hidden(&SegmentKey::new(axis, line, segment)))
                });
                if let Some(line) = fully_hidden {
                    self.remove(axis, line);
                    removed += 1;
                    continue 'outer;
                }
            }
            break;
        }
        removed
    }

    /// Удалить перегородки вне диапазона ±limit (после уменьшения полости);
    /// вернуть число удалённых
    pub fn retain_within(&mut self, axis: DividerAxis, limit: f64) -> usize {
        let mut removed = 0;
        while let Some(index) = self.lines(axis).iter().position(|p| p.abs() > limit) {
            self.remove(axis, index);
            removed += 1;
        }
        removed
    }

    /// Убрать все перегородки
    pub fn clear(&mut self) {
        self.x.clear();
        self.z.clear();
        self.hidden.clear();
    }

    /// Найти участок перегородки рядом с точкой (x, z) вида сверху
    pub fn hit_test(&self, x: f64, z: f64, cavity_half: [f64; 2], margin: f64) -> Option<SegmentKey> {
        let [hx, hz] = cavity_half;

        let z_edges = self.cell_edges(DividerAxis::Z, hz);
        for (line, &pos) in self.x.iter().enumerate() {
            if (x - pos).abs() < margin && z.abs() < hz {
                if let Some(segment) = find_interval(&z_edges, z) {
                    return Some(SegmentKey::new(DividerAxis::X, line, segment));
                }
            }
        }

        let x_edges = self.cell_edges(DividerAxis::X, hx);
        for (line, &pos) in self.z.iter().enumerate() {
            if (z - pos).abs() < margin && x.abs() < hx {
                if let Some(segment) = find_interval(&x_edges, x) {
                    return Some(SegmentKey::new(DividerAxis::Z, line, segment));
                }
            }
        }

        None
    }
}

fn find_interval(edges: &[f64], value: f64) -> Option<usize> {
    edges
        .windows(2)
        .position(|w| value >= w[0] && value <= w[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(axis: DividerAxis, line: usize, segment: usize) -> SegmentKey {
        SegmentKey::new(axis, line, segment)
    }

    #[test]
    fn test_add_keeps_sorted_and_clamps() {
        let mut layout = DividerLayout::default();
        assert_eq!(layout.add(DividerAxis::X, 20.0, 50.0), 0);
        assert_eq!(layout.add(DividerAxis::X, -10.0, 50.0), 0);
        assert_eq!(layout.add(DividerAxis::X, 500.0, 50.0), 2);
        assert_eq!(layout.x, vec![-10.0, 20.0, 50.0]);
        assert_eq!(layout.segment_count(DividerAxis::Z), 4);
    }

    #[test]
    fn test_move_clamped_between_neighbours() {
        let mut layout = DividerLayout::default();
        layout.add(DividerAxis::Z, -20.0, 50.0);
        layout.add(DividerAxis::Z, 20.0, 50.0);
        assert_eq!(layout.move_to(DividerAxis::Z, 0, 35.0, 50.0), Some(20.0));
        assert_eq!(layout.move_to(DividerAxis::Z, 1, 80.0, 50.0), Some(50.0));
        assert_eq!(layout.move_to(DividerAxis::Z, 5, 0.0, 50.0), None);
        assert_eq!(layout.z, vec![20.0, 50.0]);
    }

    #[test]
    fn test_hiding_every_segment_removes_divider() {
        let mut layout = DividerLayout::default();
        layout.add(DividerAxis::X, 0.0, 50.0);
        layout.add(DividerAxis::Z, 0.0, 50.0);
        assert_eq!(layout.segment_count(DividerAxis::X), 2);

        assert!(layout.hide_segment(key(DividerAxis::X, 0, 0)));
        assert_eq!(layout.x.len(), 1);

        assert!(layout.hide_segment(key(DividerAxis::X, 0, 1)));
        assert!(layout.x.is_empty());
        assert!(layout.hidden.is_empty());
        assert_eq!(layout.z, vec![0.0]);
    }

    #[test]
    fn test_remove_merges_cross_segments() {
        let mut layout = DividerLayout::default();
        layout.add(DividerAxis::X, -20.0, 50.0);
        layout.add(DividerAxis::X, 20.0, 50.0);
        layout.add(DividerAxis::Z, 0.0, 50.0);

        // Z-перегородка имеет три участка по X; скрыть первые два
        layout.hidden.insert(key(DividerAxis::Z, 0, 0));
        layout.hidden.insert(key(DividerAxis::Z, 0, 1));

        layout.remove(DividerAxis::X, 0);
        assert_eq!(layout.x, vec![20.0]);
        assert!(layout.is_hidden(&key(DividerAxis::Z, 0, 0)));
        assert!(!layout.is_hidden(&key(DividerAxis::Z, 0, 1)));
    }

    #[test]
    fn test_remove_drops_half_hidden_merge() {
        let mut layout = DividerLayout::default();
        layout.add(DividerAxis::X, 0.0, 50.0);
        layout.add(DividerAxis::Z, 0.0, 50.0);
        layout.hidden.insert(key(DividerAxis::Z, 0, 1));

        layout.remove(DividerAxis::X, 0);
        assert!(layout.hidden.is_empty());
    }

    #[test]
    fn test_add_splits_hidden_segment() {
        let mut layout = DividerLayout::default();
        layout.add(DividerAxis::X, 0.0, 50.0);
        layout.hidden.insert(key(DividerAxis::X, 0, 0));

        layout.add(DividerAxis::Z, 10.0, 50.0);
        assert!(layout.is_hidden(&key(DividerAxis::X, 0, 0)));
        assert!(layout.is_hidden(&key(DividerAxis::X, 0, 1)));
    }

    #[test]
    fn test_hide_segment_rejects_unknown() {
        let mut layout = DividerLayout::default();
        layout.add(DividerAxis::X, 0.0, 50.0);
        assert!(!layout.hide_segment(key(DividerAxis::X, 1, 0)));
        assert!(!layout.hide_segment(key(DividerAxis::X, 0, 1)));
        assert!(layout.hidden.is_empty());
    }

    #[test]
    fn test_retain_within_drops_out_of_range() {
        let mut layout = DividerLayout::default();
        layout.add(DividerAxis::X, -40.0, 50.0);
        layout.add(DividerAxis::X, 10.0, 50.0);
        layout.add(DividerAxis::X, 45.0, 50.0);
        layout.add(DividerAxis::Z, 0.0, 50.0);
        layout.hidden.insert(key(DividerAxis::X, 1, 0));

        assert_eq!(layout.retain_within(DividerAxis::X, 36.0), 2);
        assert_eq!(layout.x, vec![10.0]);
        // скрытый участок оставшейся перегородки переиндексирован
        assert!(layout.is_hidden(&key(DividerAxis::X, 0, 0)));
        assert_eq!(layout.retain_within(DividerAxis::Z, 36.0), 0);
        assert_eq!(layout.z, vec![0.0]);
    }

    #[test]
    fn test_hit_test() {
        let mut layout = DividerLayout::default();
        layout.add(DividerAxis::X, 10.0, 50.0);
        layout.add(DividerAxis::Z, -20.0, 50.0);

        assert_eq!(
            layout.hit_test(12.0, 5.0, [50.0, 50.0], 10.0),
            Some(key(DividerAxis::X, 0, 1))
        );
        assert_eq!(
            layout.hit_test(-30.0, -25.0, [50.0, 50.0], 10.0),
            Some(key(DividerAxis::Z, 0, 0))
        );
        assert_eq!(layout.hit_test(-40.0, 30.0, [50.0, 50.0], 10.0), None);
    }

    #[test]
    fn test_layout_serde() {
        let mut layout = DividerLayout::default();
        layout.add(DividerAxis::X, 5.0, 50.0);
        layout.hidden.insert(key(DividerAxis::X, 0, 0));
        let json = serde_json::to_string(&layout).unwrap();
        assert!(json.contains(r#""axis":"x""#));
        let back: DividerLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layout);
    }
}
