//! CPU architecture family matching.

/// Architecture families the engine ships bundles for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    Amd64,
    I386,
    Arm64,
    Arm,
}

impl Arch {
    /// Matching order is significant: amd64 first, arm last.
    pub const ALL: [Arch; 4] = [Arch::Amd64, Arch::I386, Arch::Arm64, Arch::Arm];

    /// Name fragments a raw arch string is matched against. The same
    /// fragments are used to filter candidate package URLs.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Arch::Amd64 => &["amd64", "x86_64", "x64"],
            Arch::I386 => &["x86", "i386", "i486", "i586", "i686", "i786"],
            Arch::Arm64 => &["arm64", "aarch64"],
            Arch::Arm => &["arm"],
        }
    }

    /// Case-insensitive exact-alias match.
    pub fn matches(self, arch_name: &str) -> bool {
        let lower = arch_name.to_lowercase();
        self.aliases().contains(&lower.as_str())
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Arch::Amd64 => "x64",
            Arch::I386 => "x32",
            Arch::Arm64 => "arm64",
            Arch::Arm => "arm",
        };
        f.write_str(name)
    }
}
