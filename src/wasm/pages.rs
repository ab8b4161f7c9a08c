//! Page bodies. Each page is a function component fed by the root view;
//! styling lives in `static/site.css`.

use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::contact::{ContactForm, Field, SubmitStatus};
use crate::page::PageId;

/// Pages listed in the header, in order.
pub const NAV_PAGES: [PageId; 5] = [
    PageId::Home,
    PageId::Services,
    PageId::Pricing,
    PageId::Contact,
    PageId::Login,
];

#[derive(Properties, PartialEq)]
pub struct NavProps {
    pub on_navigate: Callback<PageId>,
}

#[derive(Properties, PartialEq)]
struct CtaProps {
    target: PageId,
    label: AttrValue,
    on_navigate: Callback<PageId>,
}

#[function_component(Cta)]
fn cta(props: &CtaProps) -> Html {
    let target = props.target;
    html! {
        <button class="cta" data-page={target.key()} onclick={props.on_navigate.reform(move |_| target)}>
            { props.label.clone() }
        </button>
    }
}

#[derive(Properties, PartialEq)]
struct SectionProps {
    title: AttrValue,
    lead: AttrValue,
    #[prop_or_default]
    children: Children,
}

#[function_component(Section)]
fn section(props: &SectionProps) -> Html {
    html! {
        <section class="page-section">
            <h1>{ props.title.clone() }</h1>
            <p class="lead">{ props.lead.clone() }</p>
            { for props.children.iter() }
        </section>
    }
}

fn cards(items: &[&'static str]) -> Html {
    html! {
        <ul class="cards">
            { for items.iter().map(|item| html! { <li>{ *item }</li> }) }
        </ul>
    }
}

#[function_component(HomePage)]
pub fn home_page(props: &NavProps) -> Html {
    html! {
        <Section
            title="Des chatbots qui travaillent pour vous"
            lead="Nous concevons des assistants conversationnels sur mesure, connectés à vos données."
        >
            <Cta target={PageId::Contact} label="Démarrer un projet" on_navigate={props.on_navigate.clone()} />
            <Cta target={PageId::Services} label="Nos services" on_navigate={props.on_navigate.clone()} />
        </Section>
    }
}

#[function_component(ServicesPage)]
pub fn services_page(props: &NavProps) -> Html {
    html! {
        <Section title="Services" lead="Conception, intégration et maintenance de chatbots IA.">
            { cards(&["Chatbot site web", "Support client automatisé", "Intégrations métiers"]) }
            <Cta target={PageId::Pricing} label="Voir les tarifs" on_navigate={props.on_navigate.clone()} />
        </Section>
    }
}

#[function_component(PricingPage)]
pub fn pricing_page(props: &NavProps) -> Html {
    html! {
        <Section title="Tarifs" lead="Des formules simples, sans engagement.">
            { cards(&["Essentiel", "Pro", "Entreprise"]) }
            <Cta target={PageId::Contact} label="Demander un devis" on_navigate={props.on_navigate.clone()} />
        </Section>
    }
}

#[function_component(LoginPage)]
pub fn login_page(props: &NavProps) -> Html {
    html! {
        <Section title="Espace client" lead="Connectez-vous pour suivre vos projets.">
            <Cta target={PageId::Dashboard} label="Se connecter" on_navigate={props.on_navigate.clone()} />
        </Section>
    }
}

#[function_component(DashboardPage)]
pub fn dashboard_page(props: &NavProps) -> Html {
    html! {
        <Section title="Tableau de bord" lead="Vos chatbots, factures et rendez-vous apparaîtront ici.">
            <Cta target={PageId::Home} label="Se déconnecter" on_navigate={props.on_navigate.clone()} />
        </Section>
    }
}

#[derive(Properties, PartialEq)]
pub struct ContactProps {
    pub form: ContactForm,
    pub on_field: Callback<(Field, String)>,
    pub on_submit: Callback<()>,
    pub on_reset: Callback<()>,
}

#[function_component(ContactPage)]
pub fn contact_page(props: &ContactProps) -> Html {
    let status = props.form.status();
    let panel = if status == SubmitStatus::Success {
        html! {
            <div id="contact-panel" class="panel success">
                <p>{ "Message envoyé ! Nous vous répondrons rapidement." }</p>
                <button class="cta" onclick={props.on_reset.reform(|_| ())}>
                    { "Envoyer un autre message" }
                </button>
            </div>
        }
    } else {
        let sending = status == SubmitStatus::Sending;
        let text_input = |field: Field| {
            props.on_field.reform(move |e: InputEvent| {
                let input: HtmlInputElement = e.target_unchecked_into();
                (field, input.value())
            })
        };
        let on_message = props.on_field.reform(|e: InputEvent| {
            let area: HtmlTextAreaElement = e.target_unchecked_into();
            (Field::Message, area.value())
        });
        let onsubmit = props.on_submit.reform(|e: SubmitEvent| e.prevent_default());
        html! {
            <div id="contact-panel" class="panel">
                <form id="contact-form" {onsubmit}>
                    <input name="name" type="text" placeholder="Nom" required=true
                        value={props.form.name.clone()} oninput={text_input(Field::Name)} />
                    <input name="email" type="email" placeholder="Email" required=true
                        value={props.form.email.clone()} oninput={text_input(Field::Email)} />
                    <textarea name="message" rows="5" placeholder="Message" required=true
                        value={props.form.message.clone()} oninput={on_message} />
                    <button type="submit" class="cta" disabled={sending}>
                        { if sending { "Envoi en cours..." } else { "Envoyer" } }
                    </button>
                    if status == SubmitStatus::Error {
                        <p class="form-error">{ "Une erreur est survenue. Veuillez réessayer." }</p>
                    }
                </form>
            </div>
        }
    };

    html! {
        <Section title="Contact" lead="Une question ? Un projet ? N'hésitez pas à nous contacter.">
            { panel }
        </Section>
    }
}
