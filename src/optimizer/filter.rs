/// Cost extracted from an item by one filter stage.
pub type CostFn<T> = fn(&T) -> i64;

/// Lexicographic minimization: each stage keeps only the items attaining its minimum
/// cost, and the next stage breaks the remaining ties.
pub struct MinCostFilterChain<T> {
    stages: Vec<(&'static str, CostFn<T>)>,
}

impl<T> Default for MinCostFilterChain<T> {
    fn default() -> Self {
        Self { stages: Vec::new() }
    }
}

impl<T> MinCostFilterChain<T> {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn stage(mut self, name: &'static str, cost: CostFn<T>) -> Self {
        self.stages.push((name, cost));
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.stages.iter().map(|(name, _)| *name)
    }

    pub fn filter(&self, items: Vec<T>) -> Vec<T> {
        self.filter_with(items, |_, _| {})
    }

    /// Like [`MinCostFilterChain::filter`], reporting the survivors after every stage.
    pub fn filter_with<F>(&self, mut items: Vec<T>, mut on_stage: F) -> Vec<T>
    where
        F: FnMut(&'static str, &[T]),
    {
        for (name, cost) in &self.stages {
            if let Some(min) = items.iter().map(|item| cost(item)).min() {
                items.retain(|item| cost(item) == min);
            }
            on_stage(*name, &items);
        }
        items
    }
}
