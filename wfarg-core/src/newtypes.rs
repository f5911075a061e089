type LowLevelIdType = u32;
type LowLevelDemeType = i32;

/// The id of a node, i.e. of one chromosome.
///
/// Ids are handed out in strictly increasing
/// order, starting from zero.
///
/// ```
/// # use wfarg_core::NodeId;
/// let n = NodeId::from(3);
/// assert_eq!(n, 3);
/// assert_eq!(n.next(), Some(NodeId::from(4)));
/// assert!(NodeId::from(u32::MAX).next().is_none());
/// ```
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, std::hash::Hash)]
pub struct NodeId(LowLevelIdType);

/// The population (deme) a node is born into.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, std::hash::Hash)]
pub struct DemeId(LowLevelDemeType);

impl_table_id!(NodeId, LowLevelIdType);
impl_table_id!(DemeId, LowLevelDemeType);

impl NodeId {
    /// The id following this one, if representable.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_usize_conversion() {
        let n = NodeId::try_from(10_usize).unwrap();
        assert_eq!(usize::try_from(n).unwrap(), 10);
        assert!(NodeId::try_from(usize::MAX).is_err());
    }

    #[test]
    fn test_negative_deme_to_usize() {
        assert!(usize::try_from(DemeId::from(-1)).is_err());
        assert_eq!(usize::try_from(DemeId::from(0)).unwrap(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(NodeId::from(17).to_string(), "17");
        assert_eq!(DemeId::from(-2).to_string(), "-2");
    }
}
