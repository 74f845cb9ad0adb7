use serde::{Deserialize, Serialize};

const TECHNICAL_KEYWORDS_ES: &[&str] = &[
	"motor", "bomba", "válvula", "sensor", "actuador", "controlador", "plc", "scada",
	"automatización", "industrial", "ingeniería", "especificación", "técnico", "calibración",
	"mantenimiento", "reparación", "instalación", "configuración", "programación", "hidráulico",
	"neumático", "eléctrico", "mecánico", "sistema", "equipo", "presión", "temperatura", "caudal",
	"voltaje", "corriente", "potencia", "turbina", "compresor", "intercambiador", "reactor",
	"tanque", "tubería",
];

const TECHNICAL_KEYWORDS_EN: &[&str] = &[
	"motor", "pump", "valve", "sensor", "actuator", "controller", "plc", "scada", "automation",
	"industrial", "engineering", "specification", "technical", "calibration", "maintenance",
	"repair", "installation", "configuration", "programming", "hydraulic", "pneumatic",
	"electrical", "mechanical", "system", "equipment", "pressure", "temperature", "flow",
	"voltage", "current", "power", "turbine", "compressor", "exchanger", "reactor", "tank",
	"pipeline",
];

const TECHNICAL_KEYWORDS_PT: &[&str] = &[
	"motor", "bomba", "válvula", "sensor", "atuador", "controlador", "plc", "scada", "automação",
	"industrial", "engenharia", "especificação", "técnico", "calibração", "manutenção", "reparo",
	"instalação", "configuração", "programação", "hidráulico", "pneumático", "elétrico",
	"mecânico", "sistema", "equipamento", "pressão", "temperatura", "fluxo", "voltagem",
	"corrente", "potência", "turbina", "compressor", "trocador", "reator", "tanque", "tubulação",
];

const URGENT_WORDS: &[&str] = &[
	"urgente",
	"urgent",
	"emergency",
	"emergencia",
	"crítico",
	"critical",
	"falla",
	"failure",
];

// Project and specification requests go to engineering even without equipment vocabulary.
const TECHNICAL_TRIGGERS: &[&str] = &["especificación", "specification", "proyecto", "project"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
	En,
	Es,
	Pt,
}
impl Language {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::En => "en",
			Self::Es => "es",
			Self::Pt => "pt",
		}
	}

	fn technical_keywords(self) -> &'static [&'static str] {
		match self {
			Self::En => TECHNICAL_KEYWORDS_EN,
			Self::Es => TECHNICAL_KEYWORDS_ES,
			Self::Pt => TECHNICAL_KEYWORDS_PT,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
	General,
	Technical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
	Low,
	Medium,
	High,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Classification {
	pub category: Category,
	pub priority: Priority,
	pub confidence: f32,
}

pub fn classify_message(message: &str, language: Language) -> Classification {
	let lowered = message.to_lowercase();
	let matches =
		language.technical_keywords().iter().filter(|keyword| lowered.contains(*keyword)).count();
	let urgent = URGENT_WORDS.iter().any(|word| lowered.contains(word));
	let technical =
		matches > 0 || TECHNICAL_TRIGGERS.iter().any(|trigger| lowered.contains(trigger));
	let priority = if urgent {
		Priority::High
	} else if matches > 2 || technical {
		Priority::Medium
	} else {
		Priority::Low
	};
	let confidence = (matches as f32 * 0.3 + if technical { 0.4 } else { 0.0 }).min(1.0);

	Classification {
		category: if technical { Category::Technical } else { Category::General },
		priority,
		confidence,
	}
}

/// Local reply used unless the workflow relay returns a custom one.
pub fn canned_response(message: &str, category: Category, language: Language) -> &'static str {
	let replies = Replies::for_language(language);

	if category == Category::Technical {
		return replies.technical;
	}

	let lowered = message.to_lowercase();

	if mentions_any(&lowered, &["hola", "hello", "olá"]) {
		replies.greeting
	} else if mentions_any(&lowered, &["servicio", "service", "serviço"]) {
		replies.services
	} else if mentions_any(&lowered, &["contacto", "contact", "contato"]) {
		replies.contact
	} else if mentions_any(&lowered, &["empresa", "company", "sobre"]) {
		replies.about
	} else {
		replies.fallback
	}
}

fn mentions_any(text: &str, words: &[&str]) -> bool {
	words.iter().any(|word| text.contains(word))
}

struct Replies {
	greeting: &'static str,
	services: &'static str,
	contact: &'static str,
	about: &'static str,
	technical: &'static str,
	fallback: &'static str,
}
impl Replies {
	fn for_language(language: Language) -> Self {
		match language {
			Language::En => Self {
				greeting: "Hello! I'm the SEMHYS AI Assistant. How can I help you today?",
				services: "SEMHYS offers complete industrial engineering solutions, automation, and specialized technical consulting.",
				contact: "You can contact us through the form on our website or by writing to contact@semhys.com",
				about: "SEMHYS is a company specialized in engineering solutions and technological innovation for industry.",
				technical: "I understand you have a specialized technical inquiry. Our engineering team will review your request and provide you with a detailed response. We'll send you the corresponding technical information shortly.",
				fallback: "I understand your inquiry. I'll connect you with our specialized team to provide you with the best assistance.",
			},
			Language::Es => Self {
				greeting: "¡Hola! Soy el Asistente IA de SEMHYS. ¿En qué puedo ayudarte hoy?",
				services: "SEMHYS ofrece soluciones completas de ingeniería industrial, automatización, y consultoría técnica especializada.",
				contact: "Puedes contactarnos a través del formulario en nuestra web o escribiendo a contact@semhys.com",
				about: "SEMHYS es una empresa especializada en soluciones de ingeniería e innovación tecnológica para la industria.",
				technical: "Entiendo que tienes una consulta técnica especializada. Nuestro equipo de ingeniería revisará tu solicitud y te proporcionará una respuesta detallada. Te enviaremos la información técnica correspondiente a la brevedad.",
				fallback: "Entiendo tu consulta. Te conectaré con nuestro equipo especializado para brindarte la mejor asistencia.",
			},
			Language::Pt => Self {
				greeting: "Olá! Sou o Assistente IA da SEMHYS. Como posso ajudá-lo hoje?",
				services: "A SEMHYS oferece soluções completas de engenharia industrial, automação e consultoria técnica especializada.",
				contact: "Você pode nos contatar através do formulário em nosso site ou escrevendo para contact@semhys.com",
				about: "SEMHYS é uma empresa especializada em soluções de engenharia e inovação tecnológica para a indústria.",
				technical: "Entendo que você tem uma consulta técnica especializada. Nossa equipe de engenharia revisará sua solicitação e fornecerá uma resposta detalhada. Enviaremos as informações técnicas correspondentes em breve.",
				fallback: "Entendo sua consulta. Vou conectá-lo com nossa equipe especializada para fornecer a melhor assistência.",
			},
		}
	}
}
