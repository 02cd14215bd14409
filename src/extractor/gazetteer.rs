// file: src/extractor/gazetteer.rs
// description: known-name lists and keyword maps for containment matching
// reference: threat intelligence naming conventions

/// Known threat actors. Canonical spelling is returned on match regardless
/// of the casing found in the text.
pub const THREAT_ACTORS: &[&str] = &[
    "APT28",
    "APT29",
    "APT38",
    "APT41",
    "Lazarus",
    "Lazarus Group",
    "Cozy Bear",
    "Fancy Bear",
    "Sandworm",
    "Turla",
    "Equation Group",
    "FIN7",
    "FIN8",
    "FIN11",
    "Carbanak",
    "Cobalt Group",
    "TA505",
    "Wizard Spider",
    "Evil Corp",
    "DarkSide",
    "REvil",
    "Conti",
    "LockBit",
    "BlackCat",
    "ALPHV",
    "Cl0p",
    "Clop",
    "Hive",
    "Kimsuky",
    "Mustang Panda",
    "Stone Panda",
    "Charming Kitten",
    "Volt Typhoon",
    "Salt Typhoon",
    "Scattered Spider",
    "LAPSUS$",
    "NoName057",
    "Killnet",
    "Anonymous Sudan",
    "UNC2452",
    "UNC3886",
    "Midnight Blizzard",
    "Forest Blizzard",
    "Star Blizzard",
    "Velvet Ant",
    "Earth Lusca",
    "BlackTech",
    "Cicada",
    "MuddyWater",
];

/// Known malware families.
pub const MALWARE_FAMILIES: &[&str] = &[
    "Emotet",
    "TrickBot",
    "QakBot",
    "Qbot",
    "IcedID",
    "BazarLoader",
    "Cobalt Strike",
    "Metasploit",
    "Mimikatz",
    "BloodHound",
    "Ryuk",
    "Maze",
    "REvil",
    "Sodinokibi",
    "WannaCry",
    "NotPetya",
    "Agent Tesla",
    "FormBook",
    "Remcos",
    "AsyncRAT",
    "NjRAT",
    "RedLine",
    "Raccoon",
    "Vidar",
    "Lumma",
    "StealC",
    "BlackMatter",
    "DarkSide",
    "LockBit",
    "BlackCat",
    "Hive",
    "SmokeLoader",
    "Amadey",
    "SystemBC",
    "Bumblebee",
    "PikaBot",
    "Raspberry Robin",
    "SocGholish",
    "FakeUpdates",
    "Gootloader",
    "XWorm",
    "PlugX",
    "ShadowPad",
    "Gh0st RAT",
    "China Chopper",
    "Sliver",
    "Brute Ratel",
    "Havoc",
    "Nighthawk",
    "Mythic",
    "SUNBURST",
    "TEARDROP",
    "Raindrop",
    "NOBELIUM",
];

/// TTP tag keyword map. Several keywords feed one tag; one hit suffices.
pub const TTP_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "phishing",
        &[
            "phishing",
            "spear-phishing",
            "spearphishing",
            "credential harvesting",
            "social engineering",
            "malicious email",
            "phish",
            "bec",
            "business email compromise",
        ],
    ),
    (
        "ransomware",
        &[
            "ransomware",
            "ransom",
            "encrypt",
            "decryptor",
            "double extortion",
            "data leak site",
            "extortion",
            "triple extortion",
        ],
    ),
    (
        "credential_theft",
        &[
            "credential",
            "password",
            "stealer",
            "infostealer",
            "keylogger",
            "mimikatz",
            "dump",
            "lsass",
            "ntds",
            "credential stuffing",
        ],
    ),
    (
        "lateral_movement",
        &[
            "lateral movement",
            "psexec",
            "wmi",
            "rdp",
            "smb",
            "pass the hash",
            "pass the ticket",
            "pivoting",
            "bloodhound",
        ],
    ),
    (
        "c2",
        &[
            "command and control",
            "c2",
            "c&c",
            "beacon",
            "callback",
            "implant",
            "cobalt strike",
        ],
    ),
    (
        "persistence",
        &[
            "persistence",
            "scheduled task",
            "registry",
            "startup",
            "service",
            "backdoor",
            "webshell",
            "rootkit",
        ],
    ),
    (
        "exploitation",
        &[
            "exploit",
            "vulnerability",
            "zero-day",
            "0day",
            "rce",
            "remote code execution",
            "buffer overflow",
            "injection",
            "cve-",
        ],
    ),
    (
        "data_exfiltration",
        &[
            "exfiltration",
            "data theft",
            "data leak",
            "exfil",
            "staging",
            "data breach",
        ],
    ),
    (
        "initial_access",
        &[
            "initial access",
            "drive-by",
            "watering hole",
            "supply chain",
            "compromised",
            "trojanized",
            "malvertising",
        ],
    ),
    (
        "defense_evasion",
        &[
            "evasion",
            "obfuscation",
            "packing",
            "anti-analysis",
            "sandbox",
            "disable",
            "bypass",
            "living off the land",
            "lolbin",
        ],
    ),
    (
        "ai_attack",
        &[
            "prompt injection",
            "jailbreak",
            "model poisoning",
            "adversarial",
            "llm attack",
            "ai attack",
            "model extraction",
            "membership inference",
            "data poisoning",
            "backdoor attack",
            "trojan model",
        ],
    ),
    (
        "ai_abuse",
        &[
            "deepfake",
            "synthetic media",
            "ai-generated",
            "voice cloning",
            "face swap",
            "ai fraud",
            "generative ai",
            "ai-powered malware",
            "ai phishing",
        ],
    ),
    (
        "ai_supply_chain",
        &[
            "model supply chain",
            "model hub",
            "ai pipeline",
            "mlops",
            "model registry",
        ],
    ),
];

/// Affected products and technologies.
pub const PRODUCTS: &[(&str, &[&str])] = &[
    (
        "aws",
        &[
            "aws",
            "amazon web services",
            "s3 bucket",
            "ec2",
            "lambda",
            "cloudfront",
        ],
    ),
    (
        "azure",
        &[
            "azure",
            "microsoft azure",
            "azure ad",
            "entra",
            "office 365",
            "o365",
            "m365",
        ],
    ),
    ("gcp", &["google cloud", "gcp", "bigquery", "cloud run"]),
    ("crowdstrike", &["crowdstrike", "falcon"]),
    ("sentinelone", &["sentinelone", "sentinel one"]),
    ("palo_alto", &["palo alto", "pan-os", "cortex", "prisma"]),
    ("fortinet", &["fortinet", "fortigate", "fortios"]),
    ("cisco", &["cisco", "meraki", "umbrella", "firepower"]),
    (
        "microsoft",
        &[
            "microsoft",
            "windows",
            "exchange",
            "sharepoint",
            "teams",
            "outlook",
        ],
    ),
    ("vmware", &["vmware", "esxi", "vcenter", "horizon"]),
    ("citrix", &["citrix", "netscaler", "xenapp"]),
    ("oracle", &["oracle", "weblogic", "e-business"]),
    ("sap", &["sap", "s4hana", "netweaver"]),
    ("salesforce", &["salesforce", "sfdc"]),
    ("ivanti", &["ivanti", "pulse secure", "mobileiron"]),
    ("f5", &["f5", "big-ip", "nginx"]),
    ("juniper", &["juniper", "junos"]),
    ("sophos", &["sophos"]),
];

/// Geographic regions and the phrases that imply them.
pub const GEOGRAPHY: &[(&str, &[&str])] = &[
    (
        "russia",
        &["russia", "russian", "moscow", "kremlin", "fsb", "gru", "svr"],
    ),
    (
        "china",
        &[
            "china", "chinese", "beijing", "prc", "pla", "mss", "apt1", "apt10", "apt41",
        ],
    ),
    (
        "north_korea",
        &["north korea", "dprk", "pyongyang", "lazarus", "kimsuky", "apt38"],
    ),
    (
        "iran",
        &[
            "iran",
            "iranian",
            "tehran",
            "irgc",
            "apt33",
            "apt34",
            "apt35",
            "charming kitten",
            "muddywater",
        ],
    ),
    (
        "usa",
        &["united states", "usa", "us-cert", "cisa", "fbi", "nsa"],
    ),
    (
        "uk",
        &["united kingdom", "ncsc", "gchq", "britain", "british"],
    ),
    (
        "eu",
        &["european union", "europe", "enisa", "europol"],
    ),
    ("israel", &["israel", "israeli", "mossad", "unit 8200"]),
    ("ukraine", &["ukraine", "ukrainian", "kyiv"]),
    ("india", &["india", "indian", "cert-in"]),
    ("australia", &["australia", "australian", "acsc"]),
    ("japan", &["japan", "japanese", "jpcert"]),
    ("south_korea", &["south korea", "krcert"]),
];

/// Industry sectors.
pub const SECTORS: &[(&str, &[&str])] = &[
    (
        "financial",
        &[
            "bank",
            "banking",
            "financial",
            "finance",
            "fintech",
            "payment",
            "swift",
            "crypto",
            "cryptocurrency",
            "defi",
        ],
    ),
    (
        "healthcare",
        &[
            "healthcare",
            "hospital",
            "medical",
            "health",
            "hipaa",
            "pharma",
            "pharmaceutical",
        ],
    ),
    (
        "government",
        &[
            "government",
            "federal",
            "municipal",
            "public sector",
            "defense",
            "military",
            "dod",
        ],
    ),
    (
        "energy",
        &[
            "energy",
            "oil",
            "gas",
            "utility",
            "power grid",
            "scada",
            "ics",
            "industrial control",
        ],
    ),
    (
        "technology",
        &[
            "technology",
            "software",
            "saas",
            "cloud",
            "it services",
            "msp",
        ],
    ),
    (
        "education",
        &["education", "university", "school", "academic", "research"],
    ),
    (
        "retail",
        &[
            "retail",
            "e-commerce",
            "ecommerce",
            "pos",
            "point of sale",
            "merchant",
        ],
    ),
    (
        "manufacturing",
        &[
            "manufacturing",
            "industrial",
            "factory",
            "supply chain",
            "logistics",
        ],
    ),
    (
        "telecom",
        &[
            "telecom",
            "telecommunications",
            "carrier",
            "5g",
            "mobile network",
        ],
    ),
    (
        "transportation",
        &[
            "transportation",
            "aviation",
            "airline",
            "maritime",
            "shipping",
            "rail",
        ],
    ),
    (
        "media",
        &["media", "entertainment", "news", "broadcast", "streaming"],
    ),
    ("legal", &["legal", "law firm", "attorney"]),
    (
        "critical_infrastructure",
        &["critical infrastructure", "water", "dam", "nuclear", "pipeline"],
    ),
];

/// Domains that show up constantly in reporting but are never indicators.
pub const FALSE_POSITIVE_DOMAINS: &[&str] = &[
    "example.com",
    "microsoft.com",
    "google.com",
    "github.com",
    "twitter.com",
    "facebook.com",
    "linkedin.com",
    "youtube.com",
    "bleepingcomputer.com",
    "gbhackers.com",
    "virustotal.com",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gazetteers_are_nonempty() {
        assert!(!THREAT_ACTORS.is_empty());
        assert!(!MALWARE_FAMILIES.is_empty());
        assert!(!TTP_KEYWORDS.is_empty());
    }

    #[test]
    fn test_ttp_keywords_are_lowercase() {
        for (tag, keywords) in TTP_KEYWORDS {
            assert_eq!(*tag, tag.to_lowercase());
            for kw in *keywords {
                assert_eq!(*kw, kw.to_lowercase(), "keyword for tag {tag}");
            }
        }
    }

    #[test]
    fn test_false_positive_domains_are_lowercase() {
        for domain in FALSE_POSITIVE_DOMAINS {
            assert_eq!(*domain, domain.to_lowercase());
        }
    }
}
