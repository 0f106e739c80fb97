//! Landing page.
//!
//! Rendered once at startup from the static catalog. The contact form posts
//! JSON to `/api/lead` with a small inline script; the honeypot input is
//! hidden with CSS and skipped by keyboard navigation.

use crate::domain::catalog::{PROFILE, PROJECTS, SERVICES, SKILLS};
use crate::domain::schema::{HONEYPOT_FIELD, MIN_MESSAGE_CHARS};
use maud::{html, Markup, PreEscaped, DOCTYPE};

const STYLE: &str = r#"
:root { --bg: #0b0d17; --fg: #e6e8f0; --muted: #9aa0b4; --primary: #6366f1; --card: rgba(255,255,255,0.05); }
* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, sans-serif; background: var(--bg); color: var(--fg); line-height: 1.6; }
section { padding: 5rem 1.5rem; }
.wrap { max-width: 72rem; margin: 0 auto; }
.hero { min-height: 90vh; display: flex; align-items: center; text-align: center; }
.hero h1 { font-size: 3.5rem; margin: 0 0 1rem; color: var(--primary); }
.muted { color: var(--muted); }
.grid { display: grid; gap: 1.5rem; grid-template-columns: repeat(auto-fill, minmax(16rem, 1fr)); }
.card { background: var(--card); border-radius: 0.75rem; padding: 1.5rem; }
.tag { display: inline-block; padding: 0.2rem 0.7rem; margin: 0.2rem; border-radius: 999px; background: rgba(99,102,241,0.2); color: var(--primary); font-size: 0.85rem; }
.price { font-size: 1.5rem; font-weight: 700; color: var(--primary); margin: 0; }
.btn { display: inline-block; padding: 0.8rem 2rem; border-radius: 0.5rem; background: var(--primary); color: #fff; border: 0; cursor: pointer; text-decoration: none; font-size: 1rem; }
form label { display: block; margin: 1rem 0 0.3rem; }
form input[type=text], form input[type=email], form textarea { width: 100%; padding: 0.7rem; border-radius: 0.5rem; border: 1px solid #333; background: #12152a; color: var(--fg); }
.checks { display: grid; gap: 0.5rem; grid-template-columns: repeat(auto-fill, minmax(14rem, 1fr)); }
.checks label { margin: 0; }
.hp { position: absolute; left: -10000px; width: 1px; height: 1px; overflow: hidden; }
#form-status { margin-top: 1rem; min-height: 1.5rem; }
"#;

const SUBMIT_SCRIPT: &str = r#"
document.getElementById('lead-form').addEventListener('submit', async function (event) {
  event.preventDefault();
  const form = event.target;
  const status = document.getElementById('form-status');
  const data = new FormData(form);
  const payload = {
    name: data.get('name') || '',
    email: data.get('email') || '',
    message: data.get('message') || '',
    services: data.getAll('services'),
    contact_me_by_fax: data.get('contact_me_by_fax') || ''
  };
  status.textContent = 'Sending...';
  try {
    const response = await fetch('/api/lead', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify(payload)
    });
    const result = await response.json();
    if (response.ok) {
      form.reset();
      status.textContent = form.dataset.success;
    } else if (result.details) {
      status.textContent = result.details.map(function (d) { return d.message; }).join(' ');
    } else {
      status.textContent = result.error || 'Something went wrong.';
    }
  } catch (err) {
    status.textContent = 'Network error, please try again.';
  }
});
"#;

pub fn render_home() -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (PROFILE.name) " | " (PROFILE.role) }
                meta name="description" content=(PROFILE.summary);
                style { (PreEscaped(STYLE)) }
            }
            body {
                (hero())
                (about())
                (skills())
                (projects())
                (experience())
                (services())
                (contact())
                script { (PreEscaped(SUBMIT_SCRIPT)) }
            }
        }
    }
}

fn hero() -> Markup {
    html! {
        section.hero {
            div.wrap {
                h1 { (PROFILE.name) }
                h2 { (PROFILE.role) }
                p.muted { (PROFILE.summary) }
                a.btn href="#contact" { "Contact Me" }
                " "
                a.btn href="#projects" { "View Projects" }
            }
        }
    }
}

fn about() -> Markup {
    html! {
        section #about {
            div.wrap {
                h2 { "About" }
                div.card { p.muted { (PROFILE.about) } }
            }
        }
    }
}

fn skills() -> Markup {
    html! {
        section #skills {
            div.wrap {
                h2 { "Skills & Expertise" }
                div.grid {
                    @for skill in SKILLS {
                        div.card { strong { (skill) } }
                    }
                }
            }
        }
    }
}

fn projects() -> Markup {
    html! {
        section #projects {
            div.wrap {
                h2 { "Featured Projects" }
                div.grid {
                    @for project in PROJECTS {
                        article.card data-project=(project.id) {
                            h3 { (project.title) }
                            p.muted { (project.description) }
                            @for tech in project.technologies {
                                span.tag { (tech) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn experience() -> Markup {
    let experience = PROFILE.experience;
    html! {
        section #experience {
            div.wrap {
                h2 { "Experience" }
                div.card {
                    h3 { (experience.title) }
                    p { strong { (experience.company) } }
                    p.muted { (experience.period) }
                    ul {
                        @for highlight in experience.highlights {
                            li { (highlight) }
                        }
                    }
                }
            }
        }
    }
}

fn services() -> Markup {
    html! {
        section #services {
            div.wrap {
                h2 { "Services & Fixed Pricing" }
                p.muted { "Transparent, fixed-price Salesforce services tailored to your needs" }
                div.grid {
                    @for service in SERVICES {
                        article.card data-service=(service.id) {
                            h3 { (service.title) }
                            ul {
                                @for item in service.scope {
                                    li { (item) }
                                }
                            }
                            p.price { (service.price) }
                            p.muted { (service.turnaround) }
                        }
                    }
                }
                p.muted { (PROFILE.pricing_note) }
            }
        }
    }
}

fn contact() -> Markup {
    let success = format!("✅ Thanks! {} will reach out to you soon.", PROFILE.name);
    html! {
        section #contact {
            div.wrap {
                h2 { "Get In Touch" }
                p.muted { "Ready to start your Salesforce project? Fill out the form below and I'll get back to you soon." }
                form #lead-form .card data-success=(success) {
                    label for="name" { "Name *" }
                    input #name type="text" name="name" placeholder="Your name" required;

                    label for="email" { "Email *" }
                    input #email type="email" name="email" placeholder="your.email@example.com" required;

                    label for="message" { "Message *" }
                    textarea #message name="message" rows="5" minlength=(MIN_MESSAGE_CHARS)
                        placeholder="Tell me about your project..." required {}

                    label { "Services Interested In *" }
                    div.checks {
                        @for service in SERVICES {
                            label {
                                input type="checkbox" name="services" value=(service.id);
                                " " (service.title)
                            }
                        }
                    }

                    div.hp aria-hidden="true" {
                        label for=(HONEYPOT_FIELD) { "Fax number" }
                        input id=(HONEYPOT_FIELD) type="text" name=(HONEYPOT_FIELD) tabindex="-1" autocomplete="off";
                    }

                    p { button.btn type="submit" { "Send Message" } }
                    p #form-status role="status" aria-live="polite" {}
                }
            }
        }
    }
}
