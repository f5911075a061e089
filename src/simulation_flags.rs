use bitflags::bitflags;

bitflags! {
    /// Boolean flags affecting how a simulation
    /// stores and checks its output.
    ///
    /// # Example
    ///
    /// ```
    /// let f = wfarg::SimulationFlags::PREALLOCATE | wfarg::SimulationFlags::AUDIT;
    /// assert!(f.contains(wfarg::SimulationFlags::AUDIT));
    /// assert!(wfarg::SimulationFlags::default().is_empty());
    /// ```
    #[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
    pub struct SimulationFlags: u32 {
        /// Size the node and edge tables once, up front,
        /// when their final sizes are known.
        /// Otherwise they grow as needed.
        const PREALLOCATE = 1 << 0;
        /// Run the post-hoc audit of all nodes, edges,
        /// and samples before returning.
        const AUDIT = 1 << 1;
    }
}
