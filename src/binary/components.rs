//! 4-connected component labeling, statistics, and pruning.
//!
//! Labeling is two-pass union-find with path halving: the first sweep
//! assigns provisional labels and unions across left/up neighbors, the
//! second resolves roots and accumulates areas.

/// Aggregate component measurements of a 0/1 raster.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ComponentStats {
    pub count: usize,
    pub mean_area: f32,
    pub max_area: usize,
}

/// Per-pixel component ids (0 = background, components numbered from 1)
/// plus the area of each component indexed by `id - 1`.
pub struct Labeling {
    pub labels: Vec<u32>,
    pub areas: Vec<usize>,
}

struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn new() -> Self {
        Self { parent: Vec::new() }
    }

    fn make(&mut self) -> u32 {
        let id = self.parent.len() as u32;
        self.parent.push(id);
        id
    }

    fn find(&mut self, mut i: u32) -> u32 {
        while self.parent[i as usize] != i {
            let grand = self.parent[self.parent[i as usize] as usize];
            self.parent[i as usize] = grand;
            i = grand;
        }
        i
    }

    fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi as usize] = lo;
        }
    }
}

/// Label the 4-connected components of a 0/1 raster.
pub fn label_components(bin: &[u8], w: usize, h: usize) -> Labeling {
    let mut provisional = vec![0u32; w * h];
    let mut uf = UnionFind::new();

    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            if bin[i] == 0 {
                continue;
            }
            let left = (x > 0 && bin[i - 1] == 1).then(|| provisional[i - 1]);
            let up = (y > 0 && bin[i - w] == 1).then(|| provisional[i - w]);
            provisional[i] = match (left, up) {
                (None, None) => uf.make() + 1,
                (Some(l), None) => l,
                (None, Some(u)) => u,
                (Some(l), Some(u)) => {
                    uf.union(l - 1, u - 1);
                    l.min(u)
                }
            };
        }
    }

    // Resolve roots and compact ids in scan order.
    let mut root_to_id = vec![0u32; uf.parent.len()];
    let mut labels = vec![0u32; w * h];
    let mut areas: Vec<usize> = Vec::new();
    for (i, &p) in provisional.iter().enumerate() {
        if p == 0 {
            continue;
        }
        let root = uf.find(p - 1) as usize;
        if root_to_id[root] == 0 {
            areas.push(0);
            root_to_id[root] = areas.len() as u32;
        }
        let id = root_to_id[root];
        labels[i] = id;
        areas[id as usize - 1] += 1;
    }

    Labeling { labels, areas }
}

/// Measure the components of a 0/1 raster.
pub fn component_stats(bin: &[u8], w: usize, h: usize) -> ComponentStats {
    let labeling = label_components(bin, w, h);
    let count = labeling.areas.len();
    if count == 0 {
        return ComponentStats::default();
    }
    let total: usize = labeling.areas.iter().sum();
    ComponentStats {
        count,
        mean_area: total as f32 / count as f32,
        max_area: labeling.areas.iter().copied().max().unwrap_or(0),
    }
}

/// Keep components with `area >= min_area` whose area-descending rank is
/// below `max_count`; everything else becomes background.
pub fn prune_components(
    bin: &[u8],
    w: usize,
    h: usize,
    min_area: usize,
    max_count: usize,
) -> Vec<u8> {
    let labeling = label_components(bin, w, h);
    let mut order: Vec<usize> = (0..labeling.areas.len()).collect();
    order.sort_by(|&a, &b| labeling.areas[b].cmp(&labeling.areas[a]));

    let mut keep = vec![false; labeling.areas.len()];
    for (rank, &id) in order.iter().enumerate() {
        keep[id] = labeling.areas[id] >= min_area && rank < max_count;
    }

    labeling
        .labels
        .iter()
        .map(|&l| (l != 0 && keep[l as usize - 1]) as u8)
        .collect()
}
