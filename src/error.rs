use std::io;

quick_error! {
    /// host-level failures. Faults of the emulated program are never reported through this type.
    #[derive(Debug)]
    pub enum Error {
        Io(err: io::Error) {
            from()
            display("I/O error: {}", err)
            cause(err)
        }
        Config(err: toml::de::Error) {
            from()
            display("config error: {}", err)
            cause(err)
        }
        InvalidConfig(msg: String) {
            display("invalid config: {}", msg)
        }
        ImageTooLarge { size: usize, limit: usize } {
            display("program image is {} bytes, at most {} bytes can be loaded", size, limit)
        }
    }
}
