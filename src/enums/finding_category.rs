use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    HardcodedCredentials,
    NetworkCalls,
    MemoryOperations,
    BufferOverflow,
    AuthenticationBypass,
    PrivilegeEscalation,
    Obfuscation,
    Backdoor,
    Other,
}

impl FindingCategory {
    pub const ALL: [&'static str; 9] = [
        "hardcoded_credentials",
        "network_calls",
        "memory_operations",
        "buffer_overflow",
        "authentication_bypass",
        "privilege_escalation",
        "obfuscation",
        "backdoor",
        "other",
    ];
}
