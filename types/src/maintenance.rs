use std::{cmp::Ordering, fmt};

use jiff::Timestamp;
use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    Plumbing,
    Electrical,
    Hvac,
    Appliance,
    Carpentry,
    Painting,
    PestControl,
    Cleaning,
    Locksmith,
    Landscaping,
    General,
}

/// Keywords per service type. Earlier entries win ties.
///
/// A keyword matches a whole word or its plural. A trailing `*` marks a stem
/// that matches any word starting with it.
const KEYWORDS: &[(ServiceType, &[&str])] = &[
    (
        ServiceType::Plumbing,
        &[
            "plumb*", "leak*", "pipe", "drain*", "toilet", "faucet", "tap", "sink", "shower",
            "clog*", "sewage", "water pressure", "water heater",
        ],
    ),
    (
        ServiceType::Electrical,
        &[
            "electric*", "power", "outlet", "socket", "wiring", "wire", "switch", "breaker",
            "fuse", "light", "bulb",
        ],
    ),
    (
        ServiceType::Hvac,
        &[
            "hvac", "heating", "heater", "furnace", "boiler", "ventilat*", "thermostat",
            "air condition*", "aircon", "ac unit",
        ],
    ),
    (
        ServiceType::Appliance,
        &[
            "appliance", "fridge", "refrigerator", "freezer", "oven", "stove", "cooker",
            "microwave", "dishwasher", "washing machine", "dryer",
        ],
    ),
    (
        ServiceType::Carpentry,
        &["door", "window", "cabinet", "cupboard", "wood*", "floorboard", "shelf", "hinge"],
    ),
    (ServiceType::Painting, &["paint*", "peeling", "wall stain"]),
    (
        ServiceType::PestControl,
        &["pest", "rat", "mice", "mouse", "cockroach", "roach", "termite", "bedbug", "insect"],
    ),
    (ServiceType::Cleaning, &["clean*", "dirt*", "mold", "mould", "garbage", "trash"]),
    (ServiceType::Locksmith, &["lock", "key", "locked out", "deadbolt"]),
    (
        ServiceType::Landscaping,
        &["garden*", "lawn", "grass", "tree", "hedge", "yard", "landscap*"],
    ),
];

fn word_matches(word: &str, keyword: &str) -> bool {
    match keyword.strip_suffix('*') {
        Some(stem) => word.starts_with(stem),
        None => word
            .strip_prefix(keyword)
            .is_some_and(|rest| matches!(rest, "" | "s" | "es")),
    }
}

impl ServiceType {
    pub const ALL: [ServiceType; 11] = [
        ServiceType::Plumbing,
        ServiceType::Electrical,
        ServiceType::Hvac,
        ServiceType::Appliance,
        ServiceType::Carpentry,
        ServiceType::Painting,
        ServiceType::PestControl,
        ServiceType::Cleaning,
        ServiceType::Locksmith,
        ServiceType::Landscaping,
        ServiceType::General,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ServiceType::Plumbing => "Plumbing",
            ServiceType::Electrical => "Electrical",
            ServiceType::Hvac => "Heating & cooling",
            ServiceType::Appliance => "Appliance repair",
            ServiceType::Carpentry => "Carpentry",
            ServiceType::Painting => "Painting",
            ServiceType::PestControl => "Pest control",
            ServiceType::Cleaning => "Cleaning",
            ServiceType::Locksmith => "Locksmith",
            ServiceType::Landscaping => "Landscaping",
            ServiceType::General => "General maintenance",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Guess which kind of provider a free-text request needs.
///
/// Each keyword counts once per place it occurs in the text, multi-word
/// keywords as a run of consecutive words. The type with the most hits wins;
/// without any hit the request is [`ServiceType::General`].
pub fn detect_service_type(text: &str) -> ServiceType {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let hits = |keyword: &str| -> usize {
        let parts: Vec<&str> = keyword.split(' ').collect();
        words
            .windows(parts.len())
            .filter(|run| run.iter().zip(&parts).all(|(w, k)| word_matches(w, k)))
            .count()
    };

    let mut best = (ServiceType::General, 0);
    for (service_type, keywords) in KEYWORDS {
        let score: usize = keywords.iter().map(|k| hits(k)).sum();
        if score > best.1 {
            best = (*service_type, score);
        }
    }
    best.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Assigned,
    #[serde(alias = "in-progress")]
    InProgress,
    Completed,
    Cancelled,
    /// Any status this application does not recognize.
    #[serde(other)]
    Unknown,
}

impl RequestStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Assigned => "Assigned",
            RequestStatus::InProgress => "In progress",
            RequestStatus::Completed => "Completed",
            RequestStatus::Cancelled => "Cancelled",
            RequestStatus::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRequest {
    pub id: String,
    #[serde(default)]
    pub property_name: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: RequestStatus,
    #[serde(default)]
    pub assigned_provider_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl MaintenanceRequest {
    pub fn service_type(&self) -> ServiceType {
        detect_service_type(&format!("{} {}", self.title, self.description))
    }

    /// Finished or cancelled work cannot be handed to a provider.
    pub fn can_assign(&self) -> bool {
        matches!(self.status, RequestStatus::Pending | RequestStatus::Assigned)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProvider {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "known_services")]
    pub services: Vec<ServiceType>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default = "available_by_default")]
    pub available: bool,
}

fn available_by_default() -> bool {
    true
}

/// Skip service types this application does not offer instead of rejecting the provider.
fn known_services<'de, D>(deserializer: D) -> Result<Vec<ServiceType>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Entry {
        Known(ServiceType),
        Other(IgnoredAny),
    }

    Ok(Vec::<Entry>::deserialize(deserializer)?
        .into_iter()
        .filter_map(|entry| match entry {
            Entry::Known(service_type) => Some(service_type),
            Entry::Other(_) => None,
        })
        .collect())
}

impl ServiceProvider {
    /// General handymen take any job.
    pub fn offers(&self, service_type: ServiceType) -> bool {
        self.services
            .iter()
            .any(|s| *s == service_type || *s == ServiceType::General)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderQuery {
    pub service_type: Option<ServiceType>,
    pub search: String,
    pub available_only: bool,
}

impl ProviderQuery {
    pub fn for_request(request: &MaintenanceRequest) -> Self {
        Self {
            service_type: Some(request.service_type()),
            search: String::new(),
            available_only: true,
        }
    }

    pub fn matches(&self, provider: &ServiceProvider) -> bool {
        if self.available_only && !provider.available {
            return false;
        }

        if let Some(service_type) = self.service_type
            && !provider.offers(service_type)
        {
            return false;
        }

        let search = self.search.trim().to_lowercase();
        search.is_empty()
            || provider.name.to_lowercase().contains(&search)
            || provider
                .location
                .as_deref()
                .is_some_and(|l| l.to_lowercase().contains(&search))
    }

    /// Matching providers, best rated first, unrated last, then by name.
    pub fn rank<'a>(&self, providers: &'a [ServiceProvider]) -> Vec<&'a ServiceProvider> {
        let mut matched: Vec<_> = providers.iter().filter(|p| self.matches(p)).collect();
        matched.sort_by(|a, b| {
            let by_rating = match (a.rating, b.rating) {
                (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            by_rating.then_with(|| a.name.cmp(&b.name))
        });
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(name: &str, services: &[ServiceType], rating: Option<f32>) -> ServiceProvider {
        ServiceProvider {
            id: name.to_lowercase(),
            name: name.to_string(),
            services: services.to_vec(),
            location: Some("Westlands".to_string()),
            rating,
            available: true,
        }
    }

    fn request(title: &str, status: RequestStatus) -> MaintenanceRequest {
        MaintenanceRequest {
            id: "req-1".into(),
            property_name: None,
            unit: None,
            title: title.into(),
            description: String::new(),
            status,
            assigned_provider_id: None,
            created_at: None,
        }
    }

    #[test]
    fn detects_from_keyword_prefixes() {
        assert_eq!(detect_service_type("Kitchen sink is leaking"), ServiceType::Plumbing);
        assert_eq!(detect_service_type("Bedroom LIGHTS flicker"), ServiceType::Electrical);
        assert_eq!(detect_service_type("Furnace makes noise"), ServiceType::Hvac);
        assert_eq!(detect_service_type("Cockroaches in the pantry"), ServiceType::PestControl);
    }

    #[test]
    fn detects_phrases() {
        assert_eq!(detect_service_type("The air conditioning died"), ServiceType::Hvac);
        assert_eq!(detect_service_type("Washing machine won't spin"), ServiceType::Appliance);
        assert_eq!(detect_service_type("I got locked out"), ServiceType::Locksmith);
    }

    #[test]
    fn no_keywords_means_general() {
        assert_eq!(detect_service_type("Something is wrong"), ServiceType::General);
        assert_eq!(detect_service_type(""), ServiceType::General);
    }

    #[test]
    fn short_keywords_do_not_match_inside_words() {
        // "ac" would hit "back" and "rat" would hit "separate" with substring matching.
        assert_eq!(detect_service_type("separate back room"), ServiceType::General);
    }

    #[test]
    fn short_keywords_do_not_match_longer_words() {
        assert_eq!(detect_service_type("Ceiling fan rattles at night"), ServiceType::General);
        assert_eq!(detect_service_type("Question about the water rate"), ServiceType::General);
        assert_eq!(
            detect_service_type("Tape came off the window frame"),
            ServiceType::Carpentry
        );
        assert_eq!(detect_service_type("Keyboard tray in study is loose"), ServiceType::General);
    }

    #[test]
    fn plurals_and_stems_still_match() {
        assert_eq!(detect_service_type("Rats in the attic"), ServiceType::PestControl);
        assert_eq!(detect_service_type("Lost both keys"), ServiceType::Locksmith);
        assert_eq!(detect_service_type("Gardener never came"), ServiceType::Landscaping);
        assert_eq!(detect_service_type("Walls need painting"), ServiceType::Painting);
    }

    #[test]
    fn most_hits_wins() {
        assert_eq!(
            detect_service_type("Door hinge broken, cabinet loose, light out"),
            ServiceType::Carpentry
        );
    }

    #[test]
    fn ties_go_to_earlier_type() {
        assert_eq!(detect_service_type("pipe near the outlet"), ServiceType::Plumbing);
    }

    #[test]
    fn request_service_type_uses_description() {
        let mut req = request("Urgent", RequestStatus::Pending);
        req.description = "Toilet overflowing".into();
        assert_eq!(req.service_type(), ServiceType::Plumbing);
    }

    #[test]
    fn assignability_follows_status() {
        assert!(request("x", RequestStatus::Pending).can_assign());
        assert!(request("x", RequestStatus::Assigned).can_assign());
        assert!(!request("x", RequestStatus::InProgress).can_assign());
        assert!(!request("x", RequestStatus::Completed).can_assign());
        assert!(!request("x", RequestStatus::Cancelled).can_assign());
        assert!(!request("x", RequestStatus::Unknown).can_assign());
    }

    #[test]
    fn query_filters_by_type_search_and_availability() {
        let mut busy = provider("Busy Pipes", &[ServiceType::Plumbing], Some(5.0));
        busy.available = false;
        let providers = vec![
            provider("Aqua Fix", &[ServiceType::Plumbing], Some(4.0)),
            provider("Sparks", &[ServiceType::Electrical], Some(4.9)),
            provider("Handy Andy", &[ServiceType::General], None),
            busy,
        ];

        let query = ProviderQuery {
            service_type: Some(ServiceType::Plumbing),
            search: String::new(),
            available_only: true,
        };
        let names: Vec<_> = query.rank(&providers).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Aqua Fix", "Handy Andy"]);

        let query = ProviderQuery {
            search: "  SPARK ".into(),
            ..Default::default()
        };
        let names: Vec<_> = query.rank(&providers).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Sparks"]);

        let query = ProviderQuery {
            search: "westlands".into(),
            ..Default::default()
        };
        assert_eq!(query.rank(&providers).len(), 4);
    }

    #[test]
    fn ranking_orders_by_rating_then_name() {
        let providers = vec![
            provider("Zed", &[ServiceType::Cleaning], Some(4.5)),
            provider("Unrated", &[ServiceType::Cleaning], None),
            provider("Alpha", &[ServiceType::Cleaning], Some(4.5)),
            provider("Best", &[ServiceType::Cleaning], Some(4.9)),
        ];
        let names: Vec<_> = ProviderQuery::default()
            .rank(&providers)
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, ["Best", "Alpha", "Zed", "Unrated"]);
    }

    #[test]
    fn query_for_request_targets_detected_type() {
        let query = ProviderQuery::for_request(&request("Mold in bathroom", RequestStatus::Pending));
        assert_eq!(query.service_type, Some(ServiceType::Cleaning));
        assert!(query.available_only);
    }

    #[test]
    fn backend_json_shapes() {
        let req: MaintenanceRequest = serde_json::from_str(
            r#"{"id": "7", "title": "Leak", "status": "in_progress", "assignedProviderId": "p1"}"#,
        )
        .unwrap();
        assert_eq!(req.status, RequestStatus::InProgress);
        assert_eq!(req.assigned_provider_id.as_deref(), Some("p1"));

        let provider: ServiceProvider = serde_json::from_str(
            r#"{"id": "p1", "name": "Aqua", "services": ["plumbing", "pest-control"]}"#,
        )
        .unwrap();
        assert!(provider.available);
        assert!(provider.offers(ServiceType::PestControl));
        assert!(!provider.offers(ServiceType::Hvac));
    }

    #[test]
    fn unexpected_statuses_do_not_fail_the_list() {
        let requests: Vec<MaintenanceRequest> = serde_json::from_str(
            r#"[
                {"id": "1", "title": "Leak", "status": "pending"},
                {"id": "2", "title": "Fan", "status": "in-progress"},
                {"id": "3", "title": "Door", "status": "on_hold"}
            ]"#,
        )
        .unwrap();

        let statuses: Vec<_> = requests.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            [
                RequestStatus::Pending,
                RequestStatus::InProgress,
                RequestStatus::Unknown
            ]
        );
        assert!(!requests[2].can_assign());
    }

    #[test]
    fn unrecognized_services_are_dropped() {
        let providers: Vec<ServiceProvider> = serde_json::from_str(
            r#"[
                {"id": "p1", "name": "Roofers", "services": ["roofing", "carpentry"]},
                {"id": "p2", "name": "Solo", "services": ["roofing"]}
            ]"#,
        )
        .unwrap();

        assert_eq!(providers[0].services, [ServiceType::Carpentry]);
        assert!(providers[1].services.is_empty());
        assert!(!providers[1].offers(ServiceType::Plumbing));
    }
}
