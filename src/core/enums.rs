//! String enumerations shared by the API and UI surfaces.
//!
//! The remote service adds new values faster than clients release, so every
//! enumeration here is "soft": an unrecognized wire value decodes into the
//! `Other` variant with the raw string preserved, and a warning is logged.
//! Decoding never fails on an unknown value.

use std::fmt;

use serde::Deserialize;

macro_rules! soft_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $text:literal,
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )*
            /// A value this client version does not know about.
            Other(String),
        }

        impl $name {
            /// Returns the wire representation of this value.
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $text,)*
                    Self::Other(raw) => raw,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                match value {
                    $($text => Self::$variant,)*
                    other => {
                        tracing::warn!(
                            value = other,
                            "unrecognized {} value from server",
                            stringify!($name)
                        );
                        Self::Other(other.to_string())
                    }
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::from(value.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Ok(Self::from(raw))
            }
        }
    };
}

soft_enum! {
    /// Completion state of a scan.
    pub enum ScanState {
        /// State could not be determined.
        Unknown => "UNKNOWN",
        /// Only part of the analysis pipeline ran.
        Partial => "PARTIAL",
        /// The full analysis pipeline ran.
        Full => "FULL",
        /// No analysis was performed.
        Unscanned => "UNSCANNED",
    }
}

soft_enum! {
    /// Final verdict on a scanned object.
    pub enum Verdict {
        /// No threats found.
        Clean => "CLEAN",
        /// Potentially unwanted.
        Unwanted => "UNWANTED",
        /// Confirmed dangerous.
        Dangerous => "DANGEROUS",
        /// The service could not decide.
        Unknown => "UNKNOWN",
    }
}

soft_enum! {
    /// Kind of a scanned artifact in an API report.
    pub enum ArtifactType {
        /// A regular file.
        File => "FILE",
        /// An archive; its extracted members appear as child artifacts.
        Archive => "ARCHIVE",
        /// A compressed single file.
        Compressed => "COMPRESSED",
        /// An e-mail message.
        Email => "EMAIL",
        /// A process memory dump taken during behavioral analysis.
        ProcessDump => "PROCESS_DUMP",
        /// A URL.
        Url => "URL",
    }
}

soft_enum! {
    /// Analysis subsystem that produced an engine result.
    pub enum EngineSubsystem {
        /// Antivirus scanning.
        Av => "AV",
        /// Behavioral (dynamic) analysis.
        Sandbox => "SANDBOX",
        /// Static expert analysis.
        Static => "STATIC",
    }
}

soft_enum! {
    /// Kind of a behavioral-analysis log file.
    pub enum LogType {
        /// Network traffic capture (PCAP).
        Network => "NETWORK",
        /// Screen capture or video.
        Screenshot => "SCREENSHOT",
        /// Raw event log.
        EventRaw => "EVENT_RAW",
        /// Correlated events.
        EventCorrelated => "EVENT_CORRELATED",
        /// Normalized events.
        EventNormalized => "EVENT_NORMALIZED",
        /// Debugging files.
        Debug => "DEBUG",
        /// Behavior graph file.
        Graph => "GRAPH",
    }
}

soft_enum! {
    /// Kind of a network observable.
    pub enum NetworkObjectType {
        /// A URL.
        Url => "URL",
        /// An IP address.
        Ip => "IP",
        /// A DNS domain.
        Domain => "DOMAIN",
    }
}

soft_enum! {
    /// VNC access mode for interactive analysis.
    pub enum VncMode {
        /// VNC disabled.
        Disabled => "DISABLED",
        /// Full interactive access.
        Full => "FULL",
        /// View-only access.
        ReadOnly => "READ_ONLY",
    }
}

soft_enum! {
    /// Ingestion channel that originated a task.
    #[allow(missing_docs)]
    pub enum EntryPointType {
        CheckMe => "CHECK_ME",
        Dpi => "DPI",
        FileInbox => "FILE_INBOX",
        FileMonitor => "FILE_MONITOR",
        Icap => "ICAP",
        InteractiveAnalysis => "INTERACTIVE_ANALYSIS",
        MailAgent => "MAIL_AGENT",
        MailBcc => "MAIL_BCC",
        MailGateway => "MAIL_GATEWAY",
        Ptnad => "PTNAD",
        PublicApi => "PUBLIC_API",
        ScanApi => "SCAN_API",
        Unknown => "UNKNOWN",
        Web => "WEB",
    }
}

soft_enum! {
    /// Processing status at the entry point.
    #[allow(missing_docs)]
    pub enum EntryPointStatus {
        Unknown => "UNKNOWN",
        Success => "SUCCESS",
        Fail => "FAIL",
    }
}

soft_enum! {
    /// Action taken at the entry point.
    #[allow(missing_docs)]
    pub enum EntryPointAction {
        Block => "BLOCK",
        Nothing => "NOTHING",
        Pass => "PASS",
        Unknown => "UNKNOWN",
    }
}

soft_enum! {
    /// Platform a threat targets.
    #[allow(missing_docs)]
    pub enum ThreatPlatform {
        Android => "ANDROID",
        Ios => "IOS",
        Linux => "LINUX",
        Osx => "OSX",
        Windows => "WINDOWS",
        NoPlatform => "NO_PLATFORM",
    }
}

soft_enum! {
    /// Malware classification assigned by correlation.
    #[allow(missing_docs)]
    pub enum ThreatClassification {
        Adware => "ADWARE",
        Backdoor => "BACKDOOR",
        Bootkit => "BOOTKIT",
        ClientIrc => "CLIENT_IRC",
        ClientP2p => "CLIENT_P2P",
        ClientSmtp => "CLIENT_SMTP",
        Constructor => "CONSTRUCTOR",
        Dialer => "DIALER",
        Dos => "DOS",
        Downloader => "DOWNLOADER",
        EmailFlooder => "EMAIL_FLOODER",
        EmailWorm => "EMAIL_WORM",
        Exploit => "EXPLOIT",
        Flooder => "FLOODER",
        Fraudtool => "FRAUDTOOL",
        Hacktool => "HACKTOOL",
        Hoax => "HOAX",
        ImFlooder => "IM_FLOODER",
        ImWorm => "IM_WORM",
        IrcWorm => "IRC_WORM",
        Monitor => "MONITOR",
        Nettool => "NETTOOL",
        NetWorm => "NET_WORM",
        P2pWorm => "P2P_WORM",
        Phishing => "PHISHING",
        Pswtool => "PSWTOOL",
        Remoteadmin => "REMOTEADMIN",
        Risktool => "RISKTOOL",
        Rootkit => "ROOTKIT",
        ServerFtp => "SERVER_FTP",
        ServerProxy => "SERVER_PROXY",
        ServerTelnet => "SERVER_TELNET",
        ServerWeb => "SERVER_WEB",
        SmsFlooder => "SMS_FLOODER",
        Spam => "SPAM",
        Spoofer => "SPOOFER",
        Trojan => "TROJAN",
        TrojanArcbomb => "TROJAN_ARCBOMB",
        TrojanBanker => "TROJAN_BANKER",
        TrojanClicker => "TROJAN_CLICKER",
        TrojanDdos => "TROJAN_DDOS",
        TrojanDownloader => "TROJAN_DOWNLOADER",
        TrojanDropper => "TROJAN_DROPPER",
        TrojanFakeav => "TROJAN_FAKEAV",
        TrojanGamethief => "TROJAN_GAMETHIEF",
        TrojanIm => "TROJAN_IM",
        TrojanMailfinder => "TROJAN_MAILFINDER",
        TrojanNotifier => "TROJAN_NOTIFIER",
        TrojanProxy => "TROJAN_PROXY",
        TrojanPsw => "TROJAN_PSW",
        TrojanRansom => "TROJAN_RANSOM",
        TrojanSms => "TROJAN_SMS",
        TrojanSpy => "TROJAN_SPY",
        Unknown => "UNKNOWN",
        UnknownThreat => "UNKNOWN_THREAT",
        Virtool => "VIRTOOL",
        Virus => "VIRUS",
        Webtoolbar => "WEBTOOLBAR",
        Worm => "WORM",
    }
}

soft_enum! {
    /// Kind of an object in UI listings and result trees.
    #[allow(missing_docs)]
    pub enum ObjectKind {
        Archive => "ARCHIVE",
        CompressedFile => "COMPRESSED_FILE",
        Email => "EMAIL",
        EmailBody => "EMAIL_BODY",
        File => "FILE",
        Folder => "FOLDER",
        Http => "HTTP",
        SandboxDrop => "SANDBOX_DROP",
        SandboxMemoryDump => "SANDBOX_MEMORY_DUMP",
        SandboxProcessMemoryDump => "SANDBOX_PROCESS_MEMORY_DUMP",
        Url => "URL",
    }
}

soft_enum! {
    /// Structural property detected on a file.
    #[allow(missing_docs)]
    pub enum FileProperty {
        Archive => "ARCHIVE",
        Compressed => "COMPRESSED",
        Email => "EMAIL",
        Encrypted => "ENCRYPTED",
        HasAction => "HAS_ACTION",
        HasActiveX => "HAS_ACTIVE_X",
        HasAddIn => "HAS_ADD_IN",
        HasDde => "HAS_DDE",
        HasEmbedded => "HAS_EMBEDDED",
        HasJavascript => "HAS_JAVASCRIPT",
        HasMacros => "HAS_MACROS",
        HasOpenAction => "HAS_OPEN_ACTION",
        HasRemoteData => "HAS_REMOTE_DATA",
        HasRemoteTemplate => "HAS_REMOTE_TEMPLATE",
        MultiVolume => "MULTI_VOLUME",
        Office => "OFFICE",
        PyInstaller => "PY_INSTALLER",
        Sfx => "SFX",
        Sfx7z => "SFX_7z",
        SfxAce => "SFX_ACE",
        SfxRar => "SFX_RAR",
        SfxZip => "SFX_ZIP",
        Upx => "UPX",
        Protected => "PROTECTED",
    }
}

soft_enum! {
    /// Kind of a node in a UI result tree.
    pub enum TreeNodeType {
        /// A scanned artifact.
        Artifact => "ARTIFACT",
        /// A behavioral-analysis run.
        Sandbox => "SANDBOX",
        /// One stage of a multi-stage behavioral run.
        SandboxStage => "SANDBOX_STAGE",
    }
}

soft_enum! {
    /// Kind of a behavioral-analysis artifact attached to a tree node.
    #[allow(missing_docs)]
    pub enum ScanArtifactType {
        Email => "EMAIL_HEADERS_PTESC",
        Normalized => "SANDBOX_NORMALIZED_EVENT",
        Correlated => "SANDBOX_CORRELATED_EVENT",
        Graph => "SANDBOX_GRAPH",
        Debug => "SANDBOX_DEBUG_FILE",
        Video => "SANDBOX_VIDEO",
        RawEventFiles => "SANDBOX_RAW_EVENT_FILE",
        Pcap => "SANDBOX_NETWORK_FILE",
    }
}

soft_enum! {
    /// Failure kind reported inside scan results.
    #[allow(missing_docs)]
    pub enum ErrorKind {
        BootkitmonRebootTimeout => "BOOTKITMON_REBOOT_TIMEOUT",
        CancelledByRules => "CANCELLED_BY_RULES",
        CancelledByUser => "CANCELLED_BY_USER",
        CollisionError => "COLLISION_ERROR",
        ConnectionError => "CONNECTION_ERROR",
        ConnectTimeout => "CONNECT_TIMEOUT",
        Corrupted => "CORRUPTED",
        Encrypted => "ENCRYPTED",
        EngineError => "ENGINE_ERROR",
        FileNotFound => "FILE_NOT_FOUND",
        InitError => "INIT_ERROR",
        LimitExceeded => "LIMIT_EXCEEDED",
        ListsNotReadyError => "LISTS_NOT_READY_ERROR",
        MaxDownloadLimitExceeded => "MAX_DOWNLOAD_LIMIT_EXCEEDED",
        MaxRedirectExceeded => "MAX_REDIRECT_EXCEEDED",
        MaxSizeExceeded => "MAX_SIZE_EXCEEDED",
        NodeLimitExceeded => "NODE_LIMIT_EXCEEDED",
        NotAllowedRedirect => "NOT_ALLOWED_REDIRECT",
        NotEnoughImageCopies => "NOT_ENOUGH_IMAGE_COPIES",
        NotFile => "NOT_FILE",
        NotUnpackableFile => "NOT_UNPACKABLE_FILE",
        NoSuitableUnpacker => "NO_SUITABLE_UNPACKER",
        ReadTimeout => "READ_TIMEOUT",
        ResponseError => "RESPONSE_ERROR",
        ScanMachineError => "SCAN_MACHINE_ERROR",
        TimeoutError => "TIMEOUT_ERROR",
        Unknown => "UNKNOWN",
    }
}

soft_enum! {
    /// Black/white list lookup result.
    #[allow(missing_docs)]
    pub enum BlacklistStatus {
        InBlackList => "IN_BLACK_LIST",
        InWhiteList => "IN_WHITE_LIST",
        NotInLists => "NOT_IN_LISTS",
        Unknown => "UNKNOWN",
    }
}

soft_enum! {
    /// Stage of a bootkit-monitoring run relative to the VM reboot.
    #[allow(missing_docs)]
    pub enum BootkitmonStage {
        Unknown => "UNKNOWN",
        BeforeReboot => "BEFORE_REBOOT",
        AfterReboot => "AFTER_REBOOT",
    }
}

soft_enum! {
    /// Hash algorithm tag as reported by the service.
    #[allow(missing_docs)]
    pub enum HashKind {
        Md5 => "MD5",
        Sha1 => "SHA1",
        Sha256 => "SHA256",
        Unknown => "UNKNOWN",
    }
}

soft_enum! {
    /// Delivery status of a disarmed or forwarded e-mail.
    #[allow(missing_docs)]
    pub enum DeliveryStatus {
        Fail => "FAIL",
        Skip => "SKIP",
        Success => "SUCCESS",
        Unknown => "UNKNOWN",
    }
}

soft_enum! {
    /// What was delivered to a mail recipient.
    #[allow(missing_docs)]
    pub enum EmailDisposition {
        Disarmed => "DISARMED",
        Nothing => "NOTHING",
        Notification => "NOTIFICATION",
        Source => "SOURCE",
        Unknown => "UNKNOWN",
    }
}

soft_enum! {
    /// Mail-flow action for one recipient.
    #[allow(missing_docs)]
    pub enum MailAction {
        Block => "BLOCK",
        Nothing => "NOTHING",
        Pass => "PASS",
        Unknown => "UNKNOWN",
    }
}

soft_enum! {
    /// Direction of a captured HTTP exchange.
    #[allow(missing_docs)]
    pub enum HttpDirection {
        Unknown => "UNKNOWN",
        Request => "REQUEST",
        Response => "RESPONSE",
    }
}

soft_enum! {
    /// DPI capture completeness.
    #[allow(missing_docs)]
    pub enum DpiState {
        Unknown => "UNKNOWN",
        Completed => "COMPLETED",
        Truncated => "TRUNCATED",
        Error => "ERROR",
    }
}

soft_enum! {
    /// Scan engine identifiers used in UI result trees.
    #[allow(missing_docs)]
    pub enum EngineName {
        Bitdefender => "bitdefender",
        Clamav => "clamav",
        Drweb => "drweb",
        Kaspersky => "kaspersky",
        Nano => "nano",
        Ptesc => "ptesc",
        Ptioc => "ptioc",
        SandboxOverall => "pt_sandbox_overall",
        Vba => "vba",
        RuleEngine => "rule_engine",
    }
}

soft_enum! {
    /// Engine used by the URL crawler.
    #[allow(missing_docs)]
    pub enum CrawlerEngine {
        Curl => "CURL",
        WebEngine => "WEB_ENGINE",
    }
}

soft_enum! {
    /// Context a tree node was produced in.
    #[allow(missing_docs)]
    pub enum ContextType {
        Empty => "",
        Crawler => "CRAWLER",
        Ptesc => "PTESC",
        Sandbox => "SANDBOX",
    }
}

soft_enum! {
    /// Quarantine lifecycle event kind.
    #[allow(missing_docs)]
    pub enum QuarantineEventType {
        Quarantine => "QUARANTINE",
        Remove => "REMOVE",
        Send => "SEND",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_value_round_trips() {
        let v: Verdict = serde_json::from_str(r#""DANGEROUS""#).unwrap();
        assert_eq!(v, Verdict::Dangerous);
        assert_eq!(serde_json::to_string(&v).unwrap(), r#""DANGEROUS""#);
    }

    #[test]
    fn unknown_value_becomes_other_and_round_trips() {
        let v: Verdict = serde_json::from_str(r#""QUANTUM_EVIL""#).unwrap();
        assert_eq!(v, Verdict::Other("QUANTUM_EVIL".into()));
        // Other must serialize back to the raw wire string.
        assert_eq!(serde_json::to_string(&v).unwrap(), r#""QUANTUM_EVIL""#);
    }

    #[test]
    fn display_matches_wire_form() {
        assert_eq!(EngineSubsystem::Sandbox.to_string(), "SANDBOX");
        assert_eq!(ArtifactType::ProcessDump.to_string(), "PROCESS_DUMP");
    }
}
