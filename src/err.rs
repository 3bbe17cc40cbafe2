quick_error! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Error {
        /// A sentence would not fit its slot. The offending byte is dropped
        /// and the slot is left untouched; callers may keep feeding bytes,
        /// the sentence is simply cut short at the capacity limit.
        SentenceTooLong(capacity: usize) {
            description("Sentence too long")
            display("Sentence exceeded the {} byte capacity of its slot", capacity)
        }
    }
}
