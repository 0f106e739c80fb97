// Static site content. Services double as the whitelist for the contact form.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Service {
    pub id: &'static str,
    pub title: &'static str,
    pub scope: &'static [&'static str],
    pub price: &'static str,
    pub turnaround: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Project {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub technologies: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Experience {
    pub title: &'static str,
    pub company: &'static str,
    pub period: &'static str,
    pub highlights: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub name: &'static str,
    pub role: &'static str,
    pub summary: &'static str,
    pub about: &'static str,
    pub experience: Experience,
    pub pricing_note: &'static str,
}

pub const PROFILE: Profile = Profile {
    name: "Rohan Bhosale",
    role: "Salesforce Developer",
    summary: "Results-driven Salesforce Developer with 3+ years of experience in Financial \
              Services and Mortgage (LOS) solutions. Specializing in LWC, Aura, Apex, and \
              Experience Cloud to deliver end-to-end Salesforce implementations.",
    about: "With a deep passion for Salesforce development, I bring technical expertise and \
            business acumen to every project. My experience spans across Financial Services \
            and Mortgage industries, where I've successfully delivered solutions that \
            streamline operations, enhance user experiences, and drive business growth. I \
            specialize in building scalable, maintainable code using modern Salesforce \
            technologies.",
    experience: Experience {
        title: "Salesforce Developer",
        company: "Inflooens",
        period: "April 2022 – September 2025",
        highlights: &[
            "Developed and maintained Salesforce solutions for Financial Services and Mortgage industries",
            "Built custom Lightning Web Components and Apex solutions for complex business requirements",
            "Implemented API integrations with third-party systems including LOS and SMS platforms",
            "Created Experience Cloud portals for enhanced client self-service capabilities",
        ],
    },
    pricing_note: "Pricing shown in USD. Final quote confirmed after a short discovery call; \
                   complex scopes may require a custom estimate.",
};

pub const SKILLS: &[&str] = &[
    "Lightning Web Components",
    "Apex Development",
    "Experience Cloud",
    "SOQL & Data Modeling",
    "Security & Permissions",
    "Reports & Dashboards",
    "Flow Automation",
    "API Integrations",
];

pub const SERVICES: &[Service] = &[
    Service {
        id: "setup",
        title: "Setup & Configuration",
        scope: &["Org setup", "User configuration", "Basic customization"],
        price: "$900",
        turnaround: "3–5 business days",
    },
    Service {
        id: "apex",
        title: "Custom Apex Feature",
        scope: &["1 trigger + handler", "Unit tests", "Documentation"],
        price: "$1,200",
        turnaround: "3–5 business days",
    },
    Service {
        id: "lwc",
        title: "Lightning Web Component",
        scope: &["1 reusable LWC", "Responsive design", "Integration ready"],
        price: "$1,300",
        turnaround: "4–7 business days",
    },
    Service {
        id: "flow",
        title: "Flow Automation",
        scope: &["Moderate complexity", "Error handling", "Testing"],
        price: "$650",
        turnaround: "2–4 business days",
    },
    Service {
        id: "api",
        title: "API Integration",
        scope: &["One system", "Moderate complexity", "Error handling"],
        price: "$2,200",
        turnaround: "7–14 business days",
    },
    Service {
        id: "portal",
        title: "Experience Cloud Portal",
        scope: &["Starter setup", "Custom branding", "Basic pages"],
        price: "$3,000",
        turnaround: "10–20 business days",
    },
    Service {
        id: "migration",
        title: "Data Migration",
        scope: &["Up to ~100k records", "Data mapping", "Validation"],
        price: "$1,100",
        turnaround: "3–7 business days",
    },
    Service {
        id: "reports",
        title: "Reports & Dashboards",
        scope: &["Per dashboard", "Custom charts", "Filters"],
        price: "$450",
        turnaround: "1–3 business days",
    },
    Service {
        id: "security",
        title: "Security Health Check",
        scope: &["Permission audit", "Optimization", "Best practices"],
        price: "$900",
        turnaround: "2–5 business days",
    },
    Service {
        id: "support",
        title: "Ongoing Support Pack",
        scope: &["Light care plan", "Bug fixes", "Minor enhancements"],
        price: "$1,200/month",
        turnaround: "Monthly subscription",
    },
];

pub const PROJECTS: &[Project] = &[
    Project {
        id: "1",
        title: "Master Client Portal",
        description: "Built comprehensive Experience Cloud portal for client self-service with \
                      real-time data access and document management.",
        technologies: &["Experience Cloud", "LWC", "Apex", "Integration"],
    },
    Project {
        id: "2",
        title: "360 SMS Integration",
        description: "Integrated 360 SMS platform with Salesforce for automated customer \
                      communications and notification workflows.",
        technologies: &["API Integration", "Apex", "Flow", "SMS"],
    },
    Project {
        id: "3",
        title: "SMS Round-Robin Engine",
        description: "Developed intelligent lead distribution system using round-robin SMS \
                      assignment for mortgage loan officers.",
        technologies: &["Apex", "Flow Automation", "Custom Logic"],
    },
    Project {
        id: "4",
        title: "Mortgage Industry Integration",
        description: "Built seamless integrations between Salesforce and LOS systems for \
                      mortgage processing workflows.",
        technologies: &["API", "Financial Services", "Data Sync"],
    },
];

pub fn find_service(id: &str) -> Option<&'static Service> {
    SERVICES.iter().find(|service| service.id == id)
}

pub fn is_selectable(id: &str) -> bool {
    find_service(id).is_some()
}
