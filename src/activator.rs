//! Partition of indices into included and excluded

use core::fmt::Display;

//

/// Active-set manager.
///
/// Partitions indices `0..count` into included (active) and excluded (inactive) ones.
/// Every index belongs to exactly one of them.
#[derive(Debug, Clone, PartialEq)]
pub struct Activator
{
    flags: Vec<bool>,
    n_included: usize,
    last_included: Option<usize>,
}

impl Activator
{
    /// Creates an instance with all indices excluded.
    pub fn new(count: usize) -> Self
    {
        Activator {
            flags: vec![false; count],
            n_included: 0,
            last_included: None,
        }
    }

    /// Number of indices.
    pub fn count(&self) -> usize
    {
        self.flags.len()
    }

    /// Includes an index. Does nothing if already included.
    pub fn include(&mut self, i: usize)
    {
        if !self.flags[i] {
            self.flags[i] = true;
            self.n_included += 1;
            self.last_included = Some(i);
        }
    }

    /// Excludes an index. Does nothing if already excluded.
    pub fn exclude(&mut self, i: usize)
    {
        if self.flags[i] {
            self.flags[i] = false;
            self.n_included -= 1;
            if self.last_included == Some(i) {
                self.last_included = None;
            }
        }
    }

    pub fn include_all(&mut self)
    {
        for i in 0.. self.count() {
            self.include(i);
        }
    }

    pub fn exclude_all(&mut self)
    {
        self.flags.iter_mut().for_each(|f| *f = false);
        self.n_included = 0;
        self.last_included = None;
    }

    pub fn is_included(&self, i: usize) -> bool
    {
        self.flags[i]
    }

    /// Included indices in ascending order.
    pub fn included(&self) -> Vec<usize>
    {
        (0.. self.count()).filter(|&i| self.flags[i]).collect()
    }

    /// Excluded indices in ascending order.
    pub fn excluded(&self) -> Vec<usize>
    {
        (0.. self.count()).filter(|&i| !self.flags[i]).collect()
    }

    pub fn count_included(&self) -> usize
    {
        self.n_included
    }

    pub fn count_excluded(&self) -> usize
    {
        self.count() - self.n_included
    }

    /// The index most recently included, if it is still included.
    pub fn last_included(&self) -> Option<usize>
    {
        self.last_included
    }
}

impl Display for Activator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "included {:?} excluded {:?}", self.included(), self.excluded())
    }
}

//

#[test]
fn test_activator1()
{
    let mut a = Activator::new(5);
    assert_eq!(a.count_included(), 0);
    assert_eq!(a.excluded(), vec![0, 1, 2, 3, 4]);

    a.include(3);
    a.include(1);
    let snapshot = a.clone();
    a.include(1);
    assert_eq!(a, snapshot);
    assert_eq!(a.included(), vec![1, 3]);
    assert_eq!(a.last_included(), Some(1));

    a.exclude(0);
    assert_eq!(a, snapshot);

    a.exclude(1);
    assert_eq!(a.included(), vec![3]);
    assert_eq!(a.excluded(), vec![0, 1, 2, 4]);
    assert_eq!(a.count_excluded(), 4);
    assert_eq!(a.last_included(), None);

    a.include_all();
    assert_eq!(a.count_included(), 5);
    a.exclude_all();
    assert_eq!(a.count_included(), 0);
}
