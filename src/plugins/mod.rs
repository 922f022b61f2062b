//! Concrete init steps and checks.

pub mod bazel;
pub mod cc;
pub mod copyright;
pub mod format;
pub mod gn;
pub mod init;
pub mod manifest;
pub mod python;

/// C and C++ sources and headers, as handed to the C toolchains.
pub const C_EXTENSIONS: &[&str] = &[
    ".h", ".hh", ".hpp", ".c", ".cc", ".cpp", ".cxx", ".inc", ".inl",
];
