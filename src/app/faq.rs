pub struct FaqEntry {
	pub question: &'static str,
	pub answer: &'static str,
}

pub static FAQ: [FaqEntry; 5] = [
	FaqEntry {
		question: "Ilovadan qanday foydalanish mumkin?",
		answer: "Ilovadan foydalanish juda oson: '+' tugmasini bosing, kerakli hujjat turini tanlang, ma'lumotlarni kiriting va 'Tayyorlash' tugmasini bosing. AI qolganini o'zi bajaradi!",
	},
	FaqEntry {
		question: "Taqdimot yaratish qancha vaqt oladi?",
		answer: "Odatda, taqdimotni generatsiya qilish 30 soniyadan 1 daqiqagacha vaqt oladi. Bu slaydlardagi ma'lumotlar hajmiga va rasmlar mavjudligiga bog'liq.",
	},
	FaqEntry {
		question: "Generatsiya qilingan matnlarni o'zgartirsam bo'ladimi?",
		answer: "Albatta! 'Taqdimot Muharriri' ekranida har bir matn bloki to'liq tahrirlanadigan. Siz AI taklif qilgan matnni o'zgartirishingiz, to'ldirishingiz yoki butunlay o'chirib, o'zingiznikini yozishingiz mumkin.",
	},
	FaqEntry {
		question: "Balansni qanday to'ldirish mumkin?",
		answer: "'Profil' ekranidagi 'Balans' bo'limida 'Hisobni to'ldirish' tugmasini bosing. U yerda siz uchun qulay bo'lgan to'lov tizimlaridan birini tanlashingiz mumkin.",
	},
	FaqEntry {
		question: "Texnik muammo yuzaga kelsa nima qilishim kerak?",
		answer: "Agar texnik muammoga duch kelsangiz, 'Qo'llab-quvvatlash' sahifasidagi Admin bilan bog'lanish havolasi orqali bizga murojaat qiling. Muammoni iloji boricha tezroq hal qilishga harakat qilamiz.",
	},
];
