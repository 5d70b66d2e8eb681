//! The form page served at `/`.

use diet_plan_client::{ActivityLevel, Field, Goal, Sex};

pub const TITLE: &str = "Gerador de Dietas OpenAI";
pub const DESCRIPTION: &str = "Plano alimentar personalizado criado por IA";

struct Input {
    field: Field,
    label: &'static str,
    placeholder: &'static str,
    numeric: bool,
}

const INPUTS: &[Input] = &[
    Input {
        field: Field::Name,
        label: "Nome",
        placeholder: "Digite seu nome",
        numeric: false,
    },
    Input {
        field: Field::Age,
        label: "Idade",
        placeholder: "Ex: 27",
        numeric: true,
    },
    Input {
        field: Field::WeightKg,
        label: "Peso em Kg",
        placeholder: "Ex: 72.5",
        numeric: true,
    },
    Input {
        field: Field::HeightCm,
        label: "Altura em cm",
        placeholder: "Ex: 175",
        numeric: true,
    },
];

fn push_input(out: &mut String, input: &Input) {
    let kind = if input.numeric {
        r#"type="number" step="any""#
    } else {
        r#"type="text""#
    };
    out.push_str(&format!(
        r#"
      <label>{label}
        <input name="{name}" {kind} placeholder="{placeholder}">
      </label>"#,
        label = input.label,
        name = input.field.as_str(),
        placeholder = input.placeholder,
    ));
}

fn push_select(
    out: &mut String,
    field: Field,
    label: &str,
    placeholder: &str,
    options: impl IntoIterator<Item = (&'static str, &'static str)>,
) {
    out.push_str(&format!(
        r#"
      <label>{label}
        <select name="{name}">
          <option value="">{placeholder}</option>"#,
        name = field.as_str(),
    ));
    for (value, text) in options {
        out.push_str(&format!(
            r#"
          <option value="{value}">{text}</option>"#
        ));
    }
    out.push_str(
        r#"
        </select>
      </label>"#,
    );
}

/// Render the full form page. The markup only depends on constants, so the
/// caller may render it once and reuse it.
pub fn render_form_page() -> String {
    let mut fields = String::new();
    for input in INPUTS {
        push_input(&mut fields, input);
    }
    push_select(
        &mut fields,
        Field::Sex,
        "Sexo",
        "Selecione o sexo",
        Sex::ALL.iter().map(|s| (s.as_str(), s.label())),
    );
    push_select(
        &mut fields,
        Field::ActivityLevel,
        "Nível de Atividade",
        "Selecione seu Nível de Atividade",
        ActivityLevel::ALL.iter().map(|a| (a.as_str(), a.label())),
    );
    push_select(
        &mut fields,
        Field::Goal,
        "Objetivo",
        "Selecione seu Objetivo",
        Goal::ALL.iter().map(|g| (g.as_str(), g.label())),
    );

    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{TITLE}</title>
  <meta name="description" content="{DESCRIPTION}">
  <link rel="icon" href="/favicon.ico?v=2" sizes="any">
</head>
<body>
  <main>
    <h1>Calcule sua Dieta</h1>
    <form method="post" action="/diet">
      <h3>Dados Pessoais</h3>{fields}
      <button type="submit">Gerar minha Dieta</button>
    </form>
  </main>
</body>
</html>
"#
    )
}
