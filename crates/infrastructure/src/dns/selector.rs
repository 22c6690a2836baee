/// Chooses the next server to query among equivalent candidates.
pub trait ServerSelector: Send + Sync {
    fn pick(&self, candidates: &[String]) -> Option<String>;
}

/// Uniform random choice.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSelector;

impl ServerSelector for RandomSelector {
    fn pick(&self, candidates: &[String]) -> Option<String> {
        match candidates.len() {
            0 => None,
            1 => Some(candidates[0].clone()),
            n => Some(candidates[fastrand::usize(..n)].clone()),
        }
    }
}
